//! Public data structures for decoded GB scenes.
//!
//! Everything here is plain, renderer-agnostic data. Exporters walk these
//! types (or their `serde` form) and never attach behavior to them.

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Serialize, Serializer};

use super::header::GbHeader;
use crate::formats::common::Color;

/// Parent value of a bone without parent.
pub const NO_PARENT: u8 = 0xFF;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Map a quantized `u16` position into the box.
    #[must_use]
    pub fn dequantize(&self, quantized: [u16; 3]) -> Vec3 {
        let scale = (self.max - self.min) / f32::from(u16::MAX);
        let q = Vec3::new(
            f32::from(quantized[0]),
            f32::from(quantized[1]),
            f32::from(quantized[2]),
        );
        self.min + q * scale
    }
}

// ============================================================================
// Skeleton
// ============================================================================

/// A bone in a skeleton.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bone {
    /// Bind transform.
    pub matrix: Mat4,
    /// Parent bone index, [`NO_PARENT`] for roots.
    pub parent: u8,
}

impl Bone {
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        (self.parent != NO_PARENT).then_some(usize::from(self.parent))
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent == NO_PARENT
    }
}

/// A skeleton containing bones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skeleton {
    pub bones: Vec<Bone>,
}

// ============================================================================
// Materials
// ============================================================================

/// Material option bitmask.
///
/// Only the bits listed in [`MaterialOptions::ALL`] are retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaterialOptions(u16);

impl MaterialOptions {
    pub const TWO_SIDED: Self = Self(0x1);
    pub const OPACITY: Self = Self(0x2);
    pub const ARGB: Self = Self(0x4);
    pub const SPECULAR: Self = Self(0x8);
    pub const LIGHT: Self = Self(0x20);
    pub const LIGHTMAP: Self = Self(0x100);
    pub const FX: Self = Self(0x200);

    /// Known options paired with their tag names.
    pub const ALL: [(Self, &'static str); 7] = [
        (Self::TWO_SIDED, "TWOSIDED"),
        (Self::OPACITY, "OPACITY"),
        (Self::ARGB, "ARGB"),
        (Self::SPECULAR, "SPECULAR"),
        (Self::LIGHT, "LIGHT"),
        (Self::LIGHTMAP, "LIGHTMAP"),
        (Self::FX, "FX"),
    ];

    /// Keep the known bits of a raw option word.
    #[must_use]
    pub fn from_bits_truncate(bits: u16) -> Self {
        let known = Self::ALL.iter().fold(0, |acc, (option, _)| acc | option.0);
        Self(bits & known)
    }

    #[must_use]
    pub fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Tag names of the options that are set.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::ALL
            .into_iter()
            .filter(move |(option, _)| self.contains(*option))
            .map(|(_, name)| name)
    }
}

impl Serialize for MaterialOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// One sample of a material's animated parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialFrame {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub opacity: f32,
    pub texture_offset: Vec2,
    pub texture_rotation: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub texture: String,
    pub options: MaterialOptions,
    /// One frame for static materials, several for texture animation.
    pub frames: Vec<MaterialFrame>,
}

impl Material {
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    /// First (or only) frame.
    #[must_use]
    pub fn frame(&self) -> Option<&MaterialFrame> {
        self.frames.first()
    }
}

// ============================================================================
// Meshes
// ============================================================================

/// On-disk vertex layout selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VertexType {
    Rigid,
    Blend1,
    Blend2,
    Blend3,
    Blend4,
    /// Rigid with a second UV set.
    RigidDouble,
}

impl VertexType {
    #[must_use]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Rigid),
            1 => Some(Self::Blend1),
            2 => Some(Self::Blend2),
            3 => Some(Self::Blend3),
            4 => Some(Self::Blend4),
            5 => Some(Self::RigidDouble),
            _ => None,
        }
    }

    /// Number of bones influencing a vertex (0 for rigid layouts).
    #[must_use]
    pub fn influence_count(self) -> usize {
        match self {
            Self::Blend1 => 1,
            Self::Blend2 => 2,
            Self::Blend3 => 3,
            Self::Blend4 => 4,
            Self::Rigid | Self::RigidDouble => 0,
        }
    }

    /// Weights stored explicitly; the last one is implied.
    #[must_use]
    pub fn explicit_weight_count(self) -> usize {
        self.influence_count().saturating_sub(1)
    }

    #[must_use]
    pub fn is_blended(self) -> bool {
        self.influence_count() > 0
    }

    #[must_use]
    pub fn has_second_uv(self) -> bool {
        self == Self::RigidDouble
    }
}

/// Index buffer encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FaceType {
    List,
    Strip,
}

impl FaceType {
    #[must_use]
    pub fn from_u8(v: u8) -> Self {
        if v == 0 { Self::List } else { Self::Strip }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub uv2: Option<Vec2>,
    /// Blend weights including the implied last weight; empty for rigid vertices.
    pub weights: Vec<f32>,
    /// Indices into [`Mesh::bones`] parallel to `weights`.
    ///
    /// Empty for rigid vertices: a rigid mesh follows its first mesh bone,
    /// if it has one, as a whole.
    pub bone_indices: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mesh {
    pub name: String,
    /// Index into [`Scene::materials`].
    pub material: usize,
    pub vertex_type: VertexType,
    pub face_type: FaceType,
    pub vertices: Vec<MeshVertex>,
    /// Triangles after unstripping, degenerate and duplicate removal.
    pub triangles: Vec<[u16; 3]>,
    /// Mesh-local bone index -> skeleton bone index.
    pub bones: Vec<u8>,
}

// ============================================================================
// Animations
// ============================================================================

/// Pose sample shared by all animations of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transformation {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyframe {
    /// Time in milliseconds.
    pub time: u16,
    pub event: String,
    /// One index into [`Scene::transformations`] per skeleton bone.
    pub transformations: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Animation {
    pub name: String,
    pub keyframes: Vec<Keyframe>,
}

// ============================================================================
// Collision
// ============================================================================

/// Bounding-volume node flag word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CollisionNodeFlags(pub u16);

impl CollisionNodeFlags {
    pub const L_LEAF: u16 = 0x1;
    pub const R_LEAF: u16 = 0x2;
    pub const X_MIN: u16 = 0x4;
    pub const X_MAX: u16 = 0x8;
    pub const Y_MIN: u16 = 0x10;
    pub const Y_MAX: u16 = 0x20;
    pub const Z_MIN: u16 = 0x40;
    pub const Z_MAX: u16 = 0x80;
    pub const L_HIDDEN: u16 = 0x100;
    pub const R_HIDDEN: u16 = 0x200;
    pub const L_CAMERA: u16 = 0x400;
    pub const R_CAMERA: u16 = 0x800;
    pub const L_NOPICK: u16 = 0x1000;
    pub const R_NOPICK: u16 = 0x2000;
    pub const L_FLOOR: u16 = 0x4000;
    pub const R_FLOOR: u16 = 0x8000;

    #[must_use]
    pub fn contains(self, mask: u16) -> bool {
        self.0 & mask == mask
    }
}

/// Bounding-volume tree node. Parsed structurally, not traversed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollisionNode {
    pub flags: CollisionNodeFlags,
    pub min: [u8; 3],
    pub max: [u8; 3],
    pub left: u16,
    pub right: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collision {
    pub bounding_box: BoundingBox,
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u16; 3]>,
    pub nodes: Vec<CollisionNode>,
}

// ============================================================================
// Scene
// ============================================================================

/// A fully decoded and resolved GB file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub header: GbHeader,
    pub version: u8,
    /// Decrypted scene name (v12+, only when a cipher was supplied).
    pub name: Option<String>,
    pub bounding_box: Option<BoundingBox>,
    pub skeleton: Option<Skeleton>,
    pub materials: Vec<Material>,
    pub meshes: Vec<Mesh>,
    pub animations: Vec<Animation>,
    pub transformations: Vec<Transformation>,
    pub collision: Option<Collision>,
}

impl Scene {
    /// Material a mesh is drawn with.
    ///
    /// Always `Some` for meshes of a decoded scene; `None` only when the
    /// scene was edited so that `mesh.material` no longer fits.
    #[must_use]
    pub fn material_of(&self, mesh: &Mesh) -> Option<&Material> {
        self.materials.get(mesh.material)
    }

    #[must_use]
    pub fn content_info(&self) -> SceneContentInfo {
        SceneContentInfo {
            bone_count: self.skeleton.as_ref().map_or(0, |s| s.bones.len()),
            material_count: self.materials.len(),
            mesh_count: self.meshes.len(),
            animation_count: self.animations.len(),
            transformation_count: self.transformations.len(),
            has_collision: self.collision.is_some(),
        }
    }
}

/// Information about what data a GB file contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneContentInfo {
    pub bone_count: usize,
    pub material_count: usize,
    pub mesh_count: usize,
    pub animation_count: usize,
    pub transformation_count: usize,
    pub has_collision: bool,
}

impl SceneContentInfo {
    /// Returns a human-readable description of the file contents.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.bone_count > 0 {
            parts.push(format!("{} bone(s)", self.bone_count));
        }
        if self.mesh_count > 0 {
            parts.push(format!("{} mesh(es)", self.mesh_count));
        }
        if self.material_count > 0 {
            parts.push(format!("{} material(s)", self.material_count));
        }
        if self.animation_count > 0 {
            parts.push(format!("{} animation(s)", self.animation_count));
        }
        if self.transformation_count > 0 {
            parts.push(format!("{} transformation(s)", self.transformation_count));
        }
        if self.has_collision {
            parts.push("collision".to_string());
        }
        if parts.is_empty() {
            "empty".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_options_keep_known_bits() {
        let options = MaterialOptions::from_bits_truncate(0x1 | 0x8 | 0x10 | 0x200);
        assert_eq!(options.bits(), 0x209);
        assert!(options.contains(MaterialOptions::TWO_SIDED));
        assert!(!options.contains(MaterialOptions::OPACITY));
        assert_eq!(options.names().collect::<Vec<_>>(), ["TWOSIDED", "SPECULAR", "FX"]);
    }

    #[test]
    fn test_vertex_type_weights() {
        assert_eq!(VertexType::from_u8(6), None);
        assert_eq!(VertexType::Blend1.explicit_weight_count(), 0);
        assert_eq!(VertexType::Blend4.explicit_weight_count(), 3);
        assert_eq!(VertexType::Rigid.explicit_weight_count(), 0);
        assert!(VertexType::RigidDouble.has_second_uv());
        assert!(!VertexType::RigidDouble.is_blended());
    }

    #[test]
    fn test_dequantize_unit_box() {
        let bbox = BoundingBox {
            min: Vec3::ZERO,
            max: Vec3::splat(65535.0),
        };
        let p = bbox.dequantize([32768, 0, 65535]);
        assert!((p - Vec3::new(32768.0, 0.0, 65535.0)).abs().max_element() < 1e-2);
    }

    #[test]
    fn test_bone_parent_sentinel() {
        let root = Bone { matrix: Mat4::IDENTITY, parent: NO_PARENT };
        let child = Bone { matrix: Mat4::IDENTITY, parent: 0 };
        assert!(root.is_root());
        assert_eq!(root.parent(), None);
        assert_eq!(child.parent(), Some(0));
    }
}
