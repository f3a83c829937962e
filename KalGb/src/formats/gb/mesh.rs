//! Mesh section.
//!
//! Per mesh: `name: u32, material: u32, vertex_type: u8, face_type: u8,
//! vertex_count: u16, index_count: u16, bone_count: u8`, then the bone remap
//! table, the vertices and the raw `u16` index buffer.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use super::faces::{group_triangles, remove_duplicate_triangles, unstrip};
use super::raw::{DescriptorOffset, RawMesh};
use super::types::{FaceType, MeshVertex, VertexType};
use crate::error::{Error, Result};
use crate::formats::common::BinaryReader;

/// Files before this version number their vertex types from 1.
const VERTEX_TYPE_REBASE_VERSION: u8 = 11;

pub(super) fn read_mesh(reader: &mut BinaryReader<'_>, version: u8, index: usize) -> Result<RawMesh> {
    let name = DescriptorOffset(reader.read_u32()?);
    // Read unsigned; a negative stored index fails the range check on resolution
    let material = reader.read_u32()?;

    let mut raw_vertex_type = reader.read_u8()?;
    let face_type = FaceType::from_u8(reader.read_u8()?);
    let vertex_count = usize::from(reader.read_u16()?);
    let index_count = usize::from(reader.read_u16()?);
    let bone_count = usize::from(reader.read_u8()?);

    if version < VERTEX_TYPE_REBASE_VERSION && raw_vertex_type > 0 {
        raw_vertex_type -= 1;
    }
    let vertex_type = VertexType::from_u8(raw_vertex_type).ok_or(Error::UnsupportedVertexType {
        mesh: index,
        vertex_type: raw_vertex_type,
    })?;

    let bones = reader.read_bytes(bone_count)?.to_vec();

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        vertices.push(read_vertex(reader, vertex_type)?);
    }

    let indices = reader.read_u16_vec(index_count)?;
    let triangles = build_triangles(&indices, face_type);

    if let Some(&bad) = triangles.iter().flatten().find(|&&i| usize::from(i) >= vertex_count) {
        return Err(Error::FaceIndexOutOfRange {
            owner: format!("mesh {index}"),
            index: u32::from(bad),
            count: vertex_count,
        });
    }

    tracing::trace!(
        "Mesh {}: {:?}/{:?}, {} vertices, {} indices -> {} triangles, {} bones",
        index,
        vertex_type,
        face_type,
        vertex_count,
        index_count,
        triangles.len(),
        bone_count
    );

    Ok(RawMesh {
        name,
        material,
        vertex_type,
        face_type,
        vertices,
        triangles,
        bones,
    })
}

/// Turn a raw index buffer into a clean triangle list.
pub(super) fn build_triangles(indices: &[u16], face_type: FaceType) -> Vec<[u16; 3]> {
    let triangles = match face_type {
        FaceType::List => group_triangles(indices),
        FaceType::Strip => group_triangles(&unstrip(indices)),
    };
    remove_duplicate_triangles(triangles)
}

/// Read one vertex.
///
/// Layout: position, explicit weights, packed bone indices (Direct3D indexed
/// vertex blending: always 4 bytes), normal, uv, and a second uv for
/// [`VertexType::RigidDouble`].
fn read_vertex(reader: &mut BinaryReader<'_>, vertex_type: VertexType) -> Result<MeshVertex> {
    let position = reader.read_vec3()?;

    let mut weights = Vec::with_capacity(vertex_type.influence_count());
    for _ in 0..vertex_type.explicit_weight_count() {
        weights.push(reader.read_f32()?);
    }

    let mut bone_indices = Vec::new();
    if vertex_type.is_blended() {
        let packed = reader.read_array::<4>()?;
        bone_indices.extend_from_slice(&packed[..vertex_type.influence_count()]);

        let explicit: f32 = weights.iter().sum();
        weights.push(1.0 - explicit);
    }

    let normal = reader.read_vec3()?;
    let uv = reader.read_vec2()?;
    let uv2 = if vertex_type.has_second_uv() {
        Some(reader.read_vec2()?)
    } else {
        None
    };

    Ok(MeshVertex {
        position,
        normal,
        uv,
        uv2,
        weights,
        bone_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_f32s(out: &mut Vec<u8>, values: &[f32]) {
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn mesh_header(vertex_type: u8, face_type: u8, vertices: u16, indices: u16, bones: u8) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&3u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&[vertex_type, face_type]);
        out.extend_from_slice(&vertices.to_le_bytes());
        out.extend_from_slice(&indices.to_le_bytes());
        out.push(bones);
        out
    }

    #[test]
    fn test_blend3_vertex_weights() {
        // Version 12: type 3 is Blend3, two explicit weights
        let mut data = mesh_header(3, 0, 1, 0, 3);
        data.extend_from_slice(&[4, 5, 6]);
        push_f32s(&mut data, &[1.0, 2.0, 3.0, 0.5, 0.2]);
        data.extend_from_slice(&[2, 1, 0, 9]);
        push_f32s(&mut data, &[0.0, 1.0, 0.0, 0.25, 0.75]);

        let mut reader = BinaryReader::new(&data);
        let mesh = read_mesh(&mut reader, 12, 0).unwrap();
        assert_eq!(reader.remaining(), 0);
        assert_eq!(mesh.vertex_type, VertexType::Blend3);
        assert_eq!(mesh.bones, vec![4, 5, 6]);

        let v = &mesh.vertices[0];
        assert_eq!(v.bone_indices, vec![2, 1, 0]);
        assert_eq!(v.weights.len(), 3);
        assert!((v.weights.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!((v.weights[2] - 0.3).abs() < 1e-5);
        assert_eq!(v.uv2, None);
    }

    fn single_vertex(on_disk_type: u8, bones: &[u8], weights: &[f32], packed: [u8; 4]) -> Vec<u8> {
        let mut data = mesh_header(on_disk_type, 0, 1, 0, bones.len() as u8);
        data.extend_from_slice(bones);
        push_f32s(&mut data, &[1.0, 2.0, 3.0]);
        push_f32s(&mut data, weights);
        data.extend_from_slice(&packed);
        push_f32s(&mut data, &[0.0, 1.0, 0.0, 0.25, 0.75]);
        data
    }

    #[test]
    fn test_blend1_vertex_has_implied_full_weight() {
        for (version, on_disk) in [(12, 1), (10, 2)] {
            let data = single_vertex(on_disk, &[5], &[], [0, 9, 9, 9]);
            let mut reader = BinaryReader::new(&data);
            let mesh = read_mesh(&mut reader, version, 0).unwrap();
            assert_eq!(reader.remaining(), 0);
            assert_eq!(mesh.vertex_type, VertexType::Blend1);

            let v = &mesh.vertices[0];
            assert_eq!(v.weights, vec![1.0]);
            assert_eq!(v.bone_indices, vec![0]);
        }
    }

    #[test]
    fn test_blend4_vertex_uses_all_packed_indices() {
        for (version, on_disk) in [(12, 4), (10, 5)] {
            let data = single_vertex(on_disk, &[3, 2, 1, 0], &[0.1, 0.2, 0.3], [0, 1, 2, 3]);
            let mut reader = BinaryReader::new(&data);
            let mesh = read_mesh(&mut reader, version, 0).unwrap();
            assert_eq!(reader.remaining(), 0);
            assert_eq!(mesh.vertex_type, VertexType::Blend4);

            let v = &mesh.vertices[0];
            assert_eq!(v.bone_indices, vec![0, 1, 2, 3]);
            assert_eq!(v.weights.len(), 4);
            assert_eq!(&v.weights[..3], &[0.1, 0.2, 0.3]);
            assert!((v.weights[3] - 0.4).abs() < 1e-5);
            assert!((v.weights.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_legacy_vertex_type_is_rebased() {
        // Version 10: on-disk 6 means RigidDouble
        let mut data = mesh_header(6, 0, 1, 0, 0);
        push_f32s(&mut data, &[0.0; 3]);
        push_f32s(&mut data, &[0.0; 3]);
        push_f32s(&mut data, &[0.1, 0.2, 0.3, 0.4]);

        let mesh = read_mesh(&mut BinaryReader::new(&data), 10, 0).unwrap();
        assert_eq!(mesh.vertex_type, VertexType::RigidDouble);
        assert_eq!(mesh.vertices[0].uv2, Some(glam::Vec2::new(0.3, 0.4)));
    }

    #[test]
    fn test_unknown_vertex_type_fails() {
        let data = mesh_header(6, 0, 0, 0, 0);
        let err = read_mesh(&mut BinaryReader::new(&data), 12, 2).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVertexType { mesh: 2, vertex_type: 6 }));
    }

    #[test]
    fn test_face_index_past_vertices_fails() {
        let mut data = mesh_header(0, 0, 1, 3, 0);
        push_f32s(&mut data, &[0.0; 8]);
        for i in [0u16, 1, 2] {
            data.extend_from_slice(&i.to_le_bytes());
        }
        let err = read_mesh(&mut BinaryReader::new(&data), 12, 0).unwrap_err();
        assert!(matches!(err, Error::FaceIndexOutOfRange { index: 1, count: 1, .. }));
    }

    #[test]
    fn test_strip_is_unstripped_and_deduplicated() {
        let triangles = build_triangles(&[0, 1, 2, 1, 0, 2], FaceType::Strip);
        // (0,1,2) (1,1,2)x (2,1,0)dup (1,2,0)dup -> only the first survives
        assert_eq!(triangles, vec![[0, 1, 2]]);
    }
}
