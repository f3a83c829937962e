//! Descriptor blob and the resolution pass.
//!
//! The blob is the last section of the file. Every deferred reference read
//! by the main pass is dereferenced here, against the blob only.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use super::material::read_material_frame;
use super::raw::{DescriptorOffset, RawAnimation, RawMaterial, RawMesh, RawScene};
use super::types::{Animation, Keyframe, Material, MaterialFrame, Mesh, Scene};
use crate::error::{Error, Result};
use crate::formats::common::BinaryReader;

/// Addressable view of the descriptor blob.
pub struct Descriptor<'a> {
    data: &'a [u8],
}

impl<'a> Descriptor<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn reader_at(&self, offset: DescriptorOffset) -> Result<BinaryReader<'a>> {
        let mut reader = BinaryReader::new(self.data);
        reader
            .seek(offset.0 as usize)
            .map_err(|_| Error::DescriptorOffsetOutOfRange {
                offset: offset.0,
                size: self.data.len(),
            })?;
        Ok(reader)
    }

    /// Read the zero-terminated string at `offset`.
    pub fn read_string(&self, offset: DescriptorOffset) -> Result<String> {
        if offset.0 as usize >= self.data.len() {
            return Err(Error::DescriptorOffsetOutOfRange {
                offset: offset.0,
                size: self.data.len(),
            });
        }
        let bytes = self
            .reader_at(offset)?
            .read_cstring()
            .ok_or(Error::UnterminatedString { offset: offset.0 })?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read `count` consecutive material frames starting at `offset`.
    pub fn read_material_frames(&self, offset: DescriptorOffset, count: u16) -> Result<Vec<MaterialFrame>> {
        let mut reader = self.reader_at(offset)?;
        let mut frames = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let frame = read_material_frame(&mut reader).map_err(|_| Error::DescriptorOffsetOutOfRange {
                offset: offset.0,
                size: self.data.len(),
            })?;
            frames.push(frame);
        }
        Ok(frames)
    }
}

/// Resolve every deferred reference of a main-pass scene.
///
/// Animations are resolved first, then meshes, then materials. Mesh material
/// indices, mesh bone tables and per-vertex bone indices are range-checked
/// here.
pub fn resolve(raw: RawScene, descriptor: &Descriptor<'_>, name: Option<String>) -> Result<Scene> {
    let RawScene {
        header,
        skeleton,
        materials,
        meshes,
        animations,
        transformations,
        collision,
    } = raw;

    let animations = animations
        .into_iter()
        .map(|animation| resolve_animation(animation, descriptor))
        .collect::<Result<Vec<_>>>()?;

    let bone_count = skeleton.as_ref().map(|s| s.bones.len());
    let meshes = meshes
        .into_iter()
        .enumerate()
        .map(|(index, mesh)| resolve_mesh(mesh, index, materials.len(), bone_count, descriptor))
        .collect::<Result<Vec<_>>>()?;

    let materials = materials
        .into_iter()
        .enumerate()
        .map(|(index, material)| {
            resolve_material(material, index, header.material_frame_count, descriptor)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Scene {
        version: header.version,
        bounding_box: header.bounding_box,
        header,
        name,
        skeleton,
        materials,
        meshes,
        animations,
        transformations,
        collision,
    })
}

fn resolve_animation(raw: RawAnimation, descriptor: &Descriptor<'_>) -> Result<Animation> {
    let name = descriptor.read_string(raw.name)?;
    let keyframes = raw
        .keyframes
        .into_iter()
        .map(|key| {
            Ok(Keyframe {
                time: key.time,
                event: descriptor.read_string(key.event)?,
                transformations: key.transformations,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Animation { name, keyframes })
}

fn resolve_mesh(
    raw: RawMesh,
    index: usize,
    material_count: usize,
    bone_count: Option<usize>,
    descriptor: &Descriptor<'_>,
) -> Result<Mesh> {
    let name = descriptor.read_string(raw.name)?;

    let material = raw.material as usize;
    if material >= material_count {
        return Err(Error::MaterialIndexOutOfRange {
            mesh: index,
            index: raw.material,
            count: material_count,
        });
    }

    // Without a skeleton there is nothing to check the remap table against
    let bone_limit = bone_count.unwrap_or(usize::MAX);
    if let Some(&bad) = raw.bones.iter().find(|&&b| usize::from(b) >= bone_limit) {
        return Err(Error::MeshBoneOutOfRange {
            mesh: index,
            index: bad,
            count: bone_limit,
        });
    }

    let table_len = raw.bones.len();
    for (vertex, item) in raw.vertices.iter().enumerate() {
        if let Some(&bad) = item.bone_indices.iter().find(|&&b| usize::from(b) >= table_len) {
            return Err(Error::VertexBoneOutOfRange {
                mesh: index,
                vertex,
                index: bad,
                count: table_len,
            });
        }
    }

    Ok(Mesh {
        name,
        material,
        vertex_type: raw.vertex_type,
        face_type: raw.face_type,
        vertices: raw.vertices,
        triangles: raw.triangles,
        bones: raw.bones,
    })
}

fn resolve_material(
    raw: RawMaterial,
    index: usize,
    frame_count: u16,
    descriptor: &Descriptor<'_>,
) -> Result<Material> {
    let frames = descriptor.read_material_frames(raw.frames, frame_count)?;
    if frames.is_empty() {
        return Err(Error::MaterialWithoutFrames { material: index });
    }
    let texture = descriptor.read_string(raw.texture)?;

    Ok(Material {
        texture,
        options: raw.options,
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_lookup() {
        let descriptor = Descriptor::new(b"Mesh_A\0walk\0");
        assert_eq!(descriptor.read_string(DescriptorOffset(0)).unwrap(), "Mesh_A");
        assert_eq!(descriptor.read_string(DescriptorOffset(7)).unwrap(), "walk");
        assert_eq!(descriptor.read_string(DescriptorOffset(9)).unwrap(), "lk");
    }

    #[test]
    fn test_string_offset_past_blob() {
        let descriptor = Descriptor::new(b"a\0");
        let err = descriptor.read_string(DescriptorOffset(2)).unwrap_err();
        assert!(matches!(err, Error::DescriptorOffsetOutOfRange { offset: 2, size: 2 }));
    }

    #[test]
    fn test_unterminated_string() {
        let descriptor = Descriptor::new(b"a\0bc");
        let err = descriptor.read_string(DescriptorOffset(2)).unwrap_err();
        assert!(matches!(err, Error::UnterminatedString { offset: 2 }));
    }

    #[test]
    fn test_frames_must_fit_in_blob() {
        let data = [0u8; 100];
        let descriptor = Descriptor::new(&data);
        assert_eq!(descriptor.read_material_frames(DescriptorOffset(28), 1).unwrap().len(), 1);
        assert!(descriptor.read_material_frames(DescriptorOffset(29), 1).is_err());
        assert!(descriptor.read_material_frames(DescriptorOffset(0), 2).is_err());
        assert!(descriptor.read_material_frames(DescriptorOffset(200), 0).is_err());
        assert!(descriptor.read_material_frames(DescriptorOffset(100), 0).unwrap().is_empty());
    }
}
