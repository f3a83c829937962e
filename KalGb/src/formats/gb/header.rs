//! GB file header
//!
//! The preamble is followed by a version-dependent set of optional fields.
//! Which fields exist for a given version is described by [`HeaderLayout`]
//! records in a static table, so supporting a new revision means adding a row.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use serde::Serialize;

use super::types::BoundingBox;
use crate::error::{Error, Result};
use crate::formats::common::BinaryReader;

/// Oldest supported format revision.
pub const GB_VERSION_MIN: u8 = 8;
/// Newest supported format revision.
pub const GB_VERSION_MAX: u8 = 12;

/// Size of the encrypted name block (v12+).
pub const NAME_BLOCK_SIZE: usize = 64;
/// Reserved bytes closing the header (v9+).
const TAIL_PADDING: usize = 16;

/// Bit in `bone_flags` marking the presence of a skeleton.
const MODEL_BONE: u8 = 0x01;

/// Optional header fields present in one format revision.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    pub version: u8,
    /// `checksum: u32` after the preamble.
    pub checksum: bool,
    /// Encrypted `[u8; 64]` name block.
    pub name_block: bool,
    /// Number of `u16` entries in the vertex count summary.
    pub vertex_summary_len: usize,
    /// Descriptor and collision sizes stored as `u32` instead of `u16`.
    pub wide_section_sizes: bool,
    /// Padding byte after the animation count.
    pub animation_padding: bool,
    /// Scene bounding box.
    pub bounding_box: bool,
    /// 16 reserved bytes at the end of the header.
    pub tail_padding: bool,
}

const HEADER_LAYOUTS: [HeaderLayout; 5] = [
    HeaderLayout {
        version: 8,
        checksum: false,
        name_block: false,
        vertex_summary_len: 6,
        wide_section_sizes: false,
        animation_padding: false,
        bounding_box: false,
        tail_padding: false,
    },
    HeaderLayout {
        version: 9,
        checksum: false,
        name_block: false,
        vertex_summary_len: 12,
        wide_section_sizes: true,
        animation_padding: true,
        bounding_box: false,
        tail_padding: true,
    },
    HeaderLayout {
        version: 10,
        checksum: true,
        name_block: false,
        vertex_summary_len: 12,
        wide_section_sizes: true,
        animation_padding: true,
        bounding_box: false,
        tail_padding: true,
    },
    HeaderLayout {
        version: 11,
        checksum: true,
        name_block: false,
        vertex_summary_len: 12,
        wide_section_sizes: true,
        animation_padding: true,
        bounding_box: true,
        tail_padding: true,
    },
    HeaderLayout {
        version: 12,
        checksum: true,
        name_block: true,
        vertex_summary_len: 12,
        wide_section_sizes: true,
        animation_padding: true,
        bounding_box: true,
        tail_padding: true,
    },
];

impl HeaderLayout {
    /// Look up the layout for a format revision.
    #[must_use]
    pub fn for_version(version: u8) -> Option<&'static Self> {
        HEADER_LAYOUTS.iter().find(|layout| layout.version == version)
    }
}

/// Parsed GB header.
///
/// Several counts are summaries the decoder never uses; they are kept so
/// tools can inspect them and so the cursor stays aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GbHeader {
    pub version: u8,
    pub bone_count: u8,
    pub bone_flags: u8,
    pub mesh_count: u8,
    /// Stored checksum (v10+). Never verified.
    pub checksum: Option<u32>,
    /// Raw encrypted name block (v12+).
    pub name_block: Option<Vec<u8>>,
    pub option: u32,
    pub vertex_counts: Vec<u16>,
    pub face_index_count: u16,
    pub bone_index_count: u16,
    pub keyframe_count: u16,
    pub descriptor_size: u32,
    pub collision_size: u32,
    pub transformation_count: u16,
    pub animation_count: u8,
    pub material_count: u16,
    /// Frames per material; forced to 0 when there are no materials.
    pub material_frame_count: u16,
    /// Scene bounds (v11+).
    pub bounding_box: Option<BoundingBox>,
}

impl GbHeader {
    /// Parse the header at the reader's current position.
    pub fn parse(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let [version, bone_count, bone_flags, mesh_count] = reader.read_array::<4>()?;

        let layout =
            HeaderLayout::for_version(version).ok_or(Error::UnsupportedVersion { version })?;

        let checksum = if layout.checksum {
            Some(reader.read_u32()?)
        } else {
            None
        };

        let name_block = if layout.name_block {
            Some(reader.read_bytes(NAME_BLOCK_SIZE)?.to_vec())
        } else {
            None
        };

        let option = reader.read_u32()?;
        let vertex_counts = reader.read_u16_vec(layout.vertex_summary_len)?;

        let face_index_count = reader.read_u16()?;
        let bone_index_count = reader.read_u16()?;
        let keyframe_count = reader.read_u16()?;

        // Reserved u16 precedes the section sizes in every revision
        reader.skip(2)?;
        let (descriptor_size, collision_size) = if layout.wide_section_sizes {
            (reader.read_u32()?, reader.read_u32()?)
        } else {
            (u32::from(reader.read_u16()?), u32::from(reader.read_u16()?))
        };

        let transformation_count = reader.read_u16()?;
        let animation_count = reader.read_u8()?;
        if layout.animation_padding {
            reader.skip(1)?;
        }

        let material_count = reader.read_u16()?;
        let mut material_frame_count = reader.read_u16()?;
        if material_count == 0 && material_frame_count != 0 {
            tracing::warn!(
                "Header declares {} material frames without materials, ignoring",
                material_frame_count
            );
            material_frame_count = 0;
        }

        let bounding_box = if layout.bounding_box {
            Some(BoundingBox {
                min: reader.read_vec3()?,
                max: reader.read_vec3()?,
            })
        } else {
            None
        };

        if layout.tail_padding {
            reader.skip(TAIL_PADDING)?;
        }

        Ok(Self {
            version,
            bone_count,
            bone_flags,
            mesh_count,
            checksum,
            name_block,
            option,
            vertex_counts,
            face_index_count,
            bone_index_count,
            keyframe_count,
            descriptor_size,
            collision_size,
            transformation_count,
            animation_count,
            material_count,
            material_frame_count,
            bounding_box,
        })
    }

    /// Whether a skeleton section follows the header.
    #[must_use]
    pub fn has_skeleton(&self) -> bool {
        self.bone_flags & MODEL_BONE != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_table_covers_supported_range() {
        for version in GB_VERSION_MIN..=GB_VERSION_MAX {
            assert_eq!(HeaderLayout::for_version(version).map(|l| l.version), Some(version));
        }
        assert!(HeaderLayout::for_version(GB_VERSION_MIN - 1).is_none());
        assert!(HeaderLayout::for_version(GB_VERSION_MAX + 1).is_none());
    }

    #[test]
    fn test_v8_header_is_narrow() {
        let mut data = vec![8, 0, 0, 0];
        data.extend_from_slice(&0u32.to_le_bytes()); // option
        data.extend_from_slice(&[0u8; 12]); // 6 x u16 vertex summary
        data.extend_from_slice(&[0u8; 6]); // face/bone/keyframe counts
        data.extend_from_slice(&[0, 0]); // reserved
        data.extend_from_slice(&7u16.to_le_bytes()); // descriptor size
        data.extend_from_slice(&0u16.to_le_bytes()); // collision size
        data.extend_from_slice(&[0, 0, 0]); // transformation + animation count
        data.extend_from_slice(&0u16.to_le_bytes()); // material count
        data.extend_from_slice(&3u16.to_le_bytes()); // material frames

        let mut reader = BinaryReader::new(&data);
        let header = GbHeader::parse(&mut reader).unwrap();
        assert_eq!(reader.remaining(), 0);
        assert_eq!(header.descriptor_size, 7);
        assert_eq!(header.vertex_counts.len(), 6);
        assert_eq!(header.material_frame_count, 0);
        assert_eq!(header.checksum, None);
        assert!(!header.has_skeleton());
    }

    #[test]
    fn test_out_of_range_versions_fail() {
        for version in [0u8, 7, 13, 255] {
            let data = [version, 0, 0, 0];
            let err = GbHeader::parse(&mut BinaryReader::new(&data)).unwrap_err();
            assert!(matches!(err, Error::UnsupportedVersion { version: v } if v == version));
        }
    }
}
