//! Records produced by the main pass, before descriptor resolution.
//!
//! Names, event labels and material frame blocks live in the descriptor blob
//! at the end of the file. The main pass only sees their offsets, which are
//! kept as [`DescriptorOffset`] so they cannot be mistaken for resolved data.

use super::header::GbHeader;
use super::types::{
    Collision, FaceType, MaterialOptions, MeshVertex, Skeleton, Transformation, VertexType,
};

/// Byte offset into the descriptor blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DescriptorOffset(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct RawMaterial {
    pub texture: DescriptorOffset,
    pub options: MaterialOptions,
    pub frames: DescriptorOffset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawMesh {
    pub name: DescriptorOffset,
    pub material: u32,
    pub vertex_type: VertexType,
    pub face_type: FaceType,
    pub vertices: Vec<MeshVertex>,
    pub triangles: Vec<[u16; 3]>,
    pub bones: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawKeyframe {
    pub time: u16,
    pub event: DescriptorOffset,
    pub transformations: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawAnimation {
    pub name: DescriptorOffset,
    pub keyframes: Vec<RawKeyframe>,
}

/// Everything read by the main pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RawScene {
    pub header: GbHeader,
    pub skeleton: Option<Skeleton>,
    pub materials: Vec<RawMaterial>,
    pub meshes: Vec<RawMesh>,
    pub animations: Vec<RawAnimation>,
    pub transformations: Vec<Transformation>,
    pub collision: Option<Collision>,
}
