//! File format handlers
//!
//! Only the GB scene container lives here; the flat-table sibling formats
//! (terrain maps, decal lists, lighting descriptors) are not handled.

pub mod common;
pub mod gb;

// Re-export main scene types
pub use gb::{GbReader, Scene, parse_gb_bytes};
