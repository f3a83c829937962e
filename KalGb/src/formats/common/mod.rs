//! Binary reading helpers shared by the GB decoder

mod primitives;
mod reader;

pub use primitives::Color;
pub use reader::BinaryReader;
