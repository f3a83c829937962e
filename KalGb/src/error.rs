//! Error types for `KalGb`

use thiserror::Error;

/// The error type for GB decoding.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Version Errors ====================
    /// The declared format version is outside the supported range.
    #[error("GB version {version} is unsupported (supported: 8-12)")]
    UnsupportedVersion {
        /// The version byte found in the file.
        version: u8,
    },

    // ==================== Validation Errors ====================
    /// A read ran past the end of the stream.
    #[error("unexpected end of data at offset {offset}: need {need} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Byte offset where the read was attempted.
        offset: usize,
        /// Requested bytes.
        need: usize,
        /// Bytes still available.
        remaining: usize,
    },

    /// Bytes remained after the descriptor blob was consumed.
    #[error("too many bytes in GB structure: {count} trailing")]
    TrailingBytes {
        /// Number of unconsumed bytes.
        count: usize,
    },

    /// A mesh declared a vertex layout this decoder does not know.
    #[error("mesh {mesh}: unsupported vertex type {vertex_type}")]
    UnsupportedVertexType {
        /// Index of the mesh in file order.
        mesh: usize,
        /// The (version-corrected) vertex type.
        vertex_type: u8,
    },

    /// A descriptor string ran to the end of the blob without a terminator.
    #[error("unterminated descriptor string at offset {offset}")]
    UnterminatedString {
        /// Descriptor offset where the string starts.
        offset: u32,
    },

    /// Materials exist but the header declares zero frames per material.
    #[error("material {material} has no frames")]
    MaterialWithoutFrames {
        /// Index of the material.
        material: usize,
    },

    // ==================== Range Errors ====================
    /// A mesh references a material that does not exist.
    #[error("mesh {mesh}: material index {index} out of range ({count} materials)")]
    MaterialIndexOutOfRange {
        /// Index of the mesh in file order.
        mesh: usize,
        /// The material index stored in the mesh.
        index: u32,
        /// Number of materials in the scene.
        count: usize,
    },

    /// A bone's parent is neither a valid bone nor the no-parent sentinel.
    #[error("bone {bone}: parent {parent} out of range ({count} bones)")]
    BoneParentOutOfRange {
        /// Index of the bone.
        bone: usize,
        /// The parent index stored in the bone.
        parent: u8,
        /// Number of bones in the skeleton.
        count: usize,
    },

    /// A mesh's bone remap table points outside the skeleton.
    #[error("mesh {mesh}: bone index {index} out of range ({count} bones)")]
    MeshBoneOutOfRange {
        /// Index of the mesh in file order.
        mesh: usize,
        /// The skeleton bone index.
        index: u8,
        /// Number of bones in the skeleton.
        count: usize,
    },

    /// A blended vertex's bone index points outside its mesh's bone table.
    #[error("mesh {mesh}, vertex {vertex}: bone index {index} out of range ({count} mesh bones)")]
    VertexBoneOutOfRange {
        /// Index of the mesh in file order.
        mesh: usize,
        /// Index of the vertex in the mesh.
        vertex: usize,
        /// The mesh-local bone index.
        index: u8,
        /// Length of the mesh bone table.
        count: usize,
    },

    /// A keyframe references a transformation that does not exist.
    #[error("animation {animation}: transformation index {index} out of range ({count} transformations)")]
    TransformationIndexOutOfRange {
        /// Index of the animation in file order.
        animation: usize,
        /// The transformation index.
        index: u16,
        /// Number of transformations in the scene.
        count: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("{owner}: face index {index} out of range ({count} vertices)")]
    FaceIndexOutOfRange {
        /// Which geometry the face belongs to.
        owner: String,
        /// The offending vertex index.
        index: u32,
        /// Number of vertices in the geometry.
        count: usize,
    },

    /// A deferred reference points outside the descriptor blob.
    #[error("descriptor offset {offset} out of range (blob is {size} bytes)")]
    DescriptorOffsetOutOfRange {
        /// The offset that was dereferenced.
        offset: u32,
        /// Size of the descriptor blob.
        size: usize,
    },
}

/// Coarse error classification used by importers to report failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unsupported format revision.
    Version,
    /// Structurally invalid stream (truncation, trailing bytes, bad layout).
    Validation,
    /// A resolved index or offset fell outside its owning array.
    Range,
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedVersion { .. } => ErrorKind::Version,
            Self::UnexpectedEof { .. }
            | Self::TrailingBytes { .. }
            | Self::UnsupportedVertexType { .. }
            | Self::UnterminatedString { .. }
            | Self::MaterialWithoutFrames { .. } => ErrorKind::Validation,
            Self::MaterialIndexOutOfRange { .. }
            | Self::BoneParentOutOfRange { .. }
            | Self::MeshBoneOutOfRange { .. }
            | Self::VertexBoneOutOfRange { .. }
            | Self::TransformationIndexOutOfRange { .. }
            | Self::FaceIndexOutOfRange { .. }
            | Self::DescriptorOffsetOutOfRange { .. } => ErrorKind::Range,
        }
    }
}

/// A specialized Result type for `KalGb` operations.
pub type Result<T> = std::result::Result<T, Error>;
