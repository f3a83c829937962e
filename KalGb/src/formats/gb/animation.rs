//! Animation and transformation sections.

use super::raw::{DescriptorOffset, RawAnimation, RawKeyframe};
use super::types::Transformation;
use crate::error::{Error, Result};
use crate::formats::common::BinaryReader;

/// Read one animation.
///
/// Keyframe headers (`time: u16, event: u32`) come first, followed by one
/// `u16` transformation index per bone for every keyframe.
pub(super) fn read_animation(
    reader: &mut BinaryReader<'_>,
    bone_count: u8,
    transformation_count: u16,
    index: usize,
) -> Result<RawAnimation> {
    let name = DescriptorOffset(reader.read_u32()?);
    let keyframe_count = usize::from(reader.read_u16()?);

    let mut headers = Vec::with_capacity(keyframe_count);
    for _ in 0..keyframe_count {
        let time = reader.read_u16()?;
        let event = DescriptorOffset(reader.read_u32()?);
        headers.push((time, event));
    }

    let mut keyframes = Vec::with_capacity(keyframe_count);
    for (time, event) in headers {
        let transformations = reader.read_u16_vec(usize::from(bone_count))?;
        if let Some(&bad) = transformations.iter().find(|&&t| t >= transformation_count) {
            return Err(Error::TransformationIndexOutOfRange {
                animation: index,
                index: bad,
                count: usize::from(transformation_count),
            });
        }
        keyframes.push(RawKeyframe {
            time,
            event,
            transformations,
        });
    }

    tracing::trace!("Animation {}: {} keyframes", index, keyframe_count);
    Ok(RawAnimation { name, keyframes })
}

/// Read one `position, rotation, scale` pose sample.
pub(super) fn read_transformation(reader: &mut BinaryReader<'_>) -> Result<Transformation> {
    Ok(Transformation {
        position: reader.read_vec3()?,
        rotation: reader.read_quat()?,
        scale: reader.read_vec3()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animation_bytes(keys: &[(u16, u32)], indices: &[u16]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(keys.len() as u16).to_le_bytes());
        for (time, event) in keys {
            out.extend_from_slice(&time.to_le_bytes());
            out.extend_from_slice(&event.to_le_bytes());
        }
        for i in indices {
            out.extend_from_slice(&i.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_keyframes_group_indices_per_bone() {
        let data = animation_bytes(&[(0, 5), (33, 9)], &[0, 1, 2, 3, 4, 5]);
        let mut reader = BinaryReader::new(&data);
        let animation = read_animation(&mut reader, 3, 6, 0).unwrap();
        assert_eq!(reader.remaining(), 0);
        assert_eq!(animation.keyframes.len(), 2);
        assert_eq!(animation.keyframes[1].time, 33);
        assert_eq!(animation.keyframes[1].event, DescriptorOffset(9));
        assert_eq!(animation.keyframes[0].transformations, vec![0, 1, 2]);
        assert_eq!(animation.keyframes[1].transformations, vec![3, 4, 5]);
    }

    #[test]
    fn test_transformation_index_is_checked() {
        let data = animation_bytes(&[(0, 0)], &[0, 4]);
        let err = read_animation(&mut BinaryReader::new(&data), 2, 4, 1).unwrap_err();
        assert!(matches!(
            err,
            Error::TransformationIndexOutOfRange { animation: 1, index: 4, count: 4 }
        ));
    }

    #[test]
    fn test_transformation_record_is_40_bytes() {
        let data = [0u8; 40];
        let mut reader = BinaryReader::new(&data);
        read_transformation(&mut reader).unwrap();
        assert_eq!(reader.remaining(), 0);
    }
}
