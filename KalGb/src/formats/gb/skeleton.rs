//! Skeleton section: `bone_count` records of `matrix: [f32; 16], parent: u8`.

use super::types::{Bone, NO_PARENT, Skeleton};
use crate::error::{Error, Result};
use crate::formats::common::BinaryReader;

pub(super) fn read_skeleton(reader: &mut BinaryReader<'_>, bone_count: u8) -> Result<Skeleton> {
    let count = usize::from(bone_count);
    let mut bones = Vec::with_capacity(count);

    for _ in 0..count {
        let matrix = reader.read_matrix4()?;
        let parent = reader.read_u8()?;
        bones.push(Bone { matrix, parent });
    }

    for (bone, item) in bones.iter().enumerate() {
        if item.parent != NO_PARENT && usize::from(item.parent) >= count {
            return Err(Error::BoneParentOutOfRange {
                bone,
                parent: item.parent,
                count,
            });
        }
    }

    tracing::debug!("Read skeleton with {} bones", count);
    Ok(Skeleton { bones })
}
