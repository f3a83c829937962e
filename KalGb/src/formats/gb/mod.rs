//! GB scene container
//!
//! A versioned little-endian container (revisions 8 to 12) holding an
//! optional skeleton, materials, meshes, skeletal animations with their
//! shared transformation pool, optional collision geometry and a trailing
//! descriptor blob with every string and material frame block.
//!
//! ```text
//! header | skeleton? | material keys | meshes | animations
//!        | transformations | collision? | descriptor blob
//! ```
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

mod animation;
mod collision;
mod descriptor;
pub mod faces;
mod header;
mod material;
mod mesh;
mod raw;
mod reader;
mod skeleton;
mod types;

pub use descriptor::Descriptor;
pub use header::{GB_VERSION_MAX, GB_VERSION_MIN, GbHeader, HeaderLayout, NAME_BLOCK_SIZE};
pub use material::MATERIAL_FRAME_SIZE;
pub use raw::DescriptorOffset;
pub use reader::{GbReader, parse_gb_bytes};
pub use types::{
    Animation, Bone, BoundingBox, Collision, CollisionNode, CollisionNodeFlags, FaceType,
    Keyframe, Material, MaterialFrame, MaterialOptions, Mesh, MeshVertex, NO_PARENT, Scene,
    SceneContentInfo, Skeleton, Transformation, VertexType,
};
