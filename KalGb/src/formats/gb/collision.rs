//! Simplified collision geometry.
//!
//! Positions are quantized to `u16` within the collision bounding box. Face
//! entries are offsets into the flattened `xyz` position array, hence the
//! division by 3. The bounding-volume tree that follows has one node fewer
//! than there are faces.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use super::faces::remove_duplicate_triangles;
use super::types::{BoundingBox, Collision, CollisionNode, CollisionNodeFlags};
use crate::error::{Error, Result};
use crate::formats::common::BinaryReader;

/// Size of the stored bounding box that v11+ files no longer use.
const REDUNDANT_BOX_SIZE: usize = 24;

/// Read the collision block.
///
/// `scene_box` is the header bounding box; when present (v11+) it replaces
/// the copy stored in the block.
pub(super) fn read_collision(
    reader: &mut BinaryReader<'_>,
    scene_box: Option<BoundingBox>,
) -> Result<Collision> {
    let start = reader.position();
    let vertex_count = usize::from(reader.read_u16()?);
    let face_count = usize::from(reader.read_u16()?);

    let bounding_box = if let Some(bbox) = scene_box {
        reader.skip(REDUNDANT_BOX_SIZE)?;
        bbox
    } else {
        BoundingBox {
            min: reader.read_vec3()?,
            max: reader.read_vec3()?,
        }
    };

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        vertices.push(bounding_box.dequantize(reader.read_u16_array::<3>()?));
    }

    let mut faces = Vec::with_capacity(face_count);
    for _ in 0..face_count {
        faces.push(reader.read_u16_array::<3>()?);
    }
    let triangles: Vec<[u16; 3]> = remove_duplicate_triangles(faces)
        .into_iter()
        .map(|face| face.map(|offset| offset / 3))
        .collect();

    if let Some(&bad) = triangles.iter().flatten().find(|&&i| usize::from(i) >= vertex_count) {
        return Err(Error::FaceIndexOutOfRange {
            owner: "collision".to_string(),
            index: u32::from(bad),
            count: vertex_count,
        });
    }

    if face_count == 0 {
        tracing::warn!("Collision block has no faces");
    }
    let node_count = face_count.saturating_sub(1);
    let mut nodes = Vec::with_capacity(node_count);
    for _ in 0..node_count {
        nodes.push(read_node(reader)?);
    }

    tracing::debug!(
        "Read collision: {} vertices, {} triangles, {} nodes ({} bytes)",
        vertices.len(),
        triangles.len(),
        nodes.len(),
        reader.position() - start
    );

    Ok(Collision {
        bounding_box,
        vertices,
        triangles,
        nodes,
    })
}

fn read_node(reader: &mut BinaryReader<'_>) -> Result<CollisionNode> {
    Ok(CollisionNode {
        flags: CollisionNodeFlags(reader.read_u16()?),
        min: reader.read_array::<3>()?,
        max: reader.read_array::<3>()?,
        left: reader.read_u16()?,
        right: reader.read_u16()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn u16s(out: &mut Vec<u8>, values: &[u16]) {
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn f32s(out: &mut Vec<u8>, values: &[f32]) {
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    #[test]
    fn test_local_box_and_dequantization() {
        let mut data = Vec::new();
        u16s(&mut data, &[3, 2]);
        f32s(&mut data, &[0.0, 0.0, 0.0, 65535.0, 65535.0, 65535.0]);
        u16s(&mut data, &[32768, 0, 65535, 0, 0, 0, 1, 2, 3]);
        // faces as flattened offsets: (0,1,2) twice with different winding
        u16s(&mut data, &[0, 3, 6, 6, 0, 3]);
        // one node
        data.extend_from_slice(&0x4001u16.to_le_bytes());
        data.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        u16s(&mut data, &[7, 8]);

        let mut reader = BinaryReader::new(&data);
        let collision = read_collision(&mut reader, None).unwrap();
        assert_eq!(reader.remaining(), 0);

        let p = collision.vertices[0];
        assert!((p - Vec3::new(32768.0, 0.0, 65535.0)).abs().max_element() < 1e-2);
        assert_eq!(collision.triangles, vec![[0, 1, 2]]);

        let node = collision.nodes[0];
        assert!(node.flags.contains(CollisionNodeFlags::L_LEAF));
        assert!(node.flags.contains(CollisionNodeFlags::L_FLOOR));
        assert!(!node.flags.contains(CollisionNodeFlags::R_LEAF));
        assert_eq!((node.min, node.max, node.left, node.right), ([1, 2, 3], [4, 5, 6], 7, 8));
    }

    #[test]
    fn test_scene_box_overrides_stored_box() {
        let scene_box = BoundingBox {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let mut data = Vec::new();
        u16s(&mut data, &[1, 0]);
        f32s(&mut data, &[9.0; 6]);
        u16s(&mut data, &[65535, 0, 65535]);

        let collision = read_collision(&mut BinaryReader::new(&data), Some(scene_box)).unwrap();
        assert_eq!(collision.bounding_box, scene_box);
        assert!((collision.vertices[0] - Vec3::new(1.0, -1.0, 1.0)).abs().max_element() < 1e-5);
        assert!(collision.nodes.is_empty());
    }

    #[test]
    fn test_face_past_vertices_fails() {
        let mut data = Vec::new();
        u16s(&mut data, &[1, 1]);
        f32s(&mut data, &[0.0; 6]);
        u16s(&mut data, &[0, 0, 0]);
        u16s(&mut data, &[0, 3, 6]);
        let err = read_collision(&mut BinaryReader::new(&data), None).unwrap_err();
        assert!(matches!(err, Error::FaceIndexOutOfRange { index: 1, count: 1, .. }));
    }
}
