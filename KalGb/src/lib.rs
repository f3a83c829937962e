#![allow(clippy::doc_markdown)]
//! # KalGb
//!
//! A pure-Rust reader for the GB scene container used by Kal Online model
//! assets.
//!
//! ## Supported Content
//!
//! - **Skeletons** - bind matrices and parent links
//! - **Meshes** - rigid, 1-4 bone skinned and double-UV vertex layouts,
//!   triangle lists and strips
//! - **Materials** - texture names, option flags and animated frames
//! - **Animations** - keyframes indexing a shared transformation pool
//! - **Collision** - quantized geometry and its bounding-volume tree
//!
//! Format revisions 8 through 12 are accepted.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kalgb::formats::parse_gb_bytes;
//!
//! let data = std::fs::read("model.gb")?;
//! let scene = parse_gb_bytes(&data)?;
//! for mesh in &scene.meshes {
//!     println!("{}: {} triangles", mesh.name, mesh.triangles.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Version 12 files carry an encrypted scene name. Supply a [`NameCipher`]
//! through [`GbReader::with_name_cipher`](formats::GbReader::with_name_cipher)
//! to have it decrypted.
//!
//! [`NameCipher`]: cipher::NameCipher

pub mod cipher;
pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::cipher::{NameCipher, SubstitutionCipher};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::formats::gb::{
        Animation, Bone, BoundingBox, Collision, GbHeader, GbReader, Keyframe, Material,
        MaterialOptions, Mesh, MeshVertex, Scene, Skeleton, Transformation, VertexType,
        parse_gb_bytes,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
