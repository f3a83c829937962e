//! Material keys and material frames.
//!
//! The key record in the main stream is 18 bytes:
//! `texture: u32, options: u16, option: u32, power: f32, frames: u32`.
//! `texture` and `frames` are descriptor offsets; `option` and `power` are
//! legacy fields the format still carries but nothing reads.

use super::raw::{DescriptorOffset, RawMaterial};
use super::types::{MaterialFrame, MaterialOptions};
use crate::error::Result;
use crate::formats::common::BinaryReader;

/// Size of one [`MaterialFrame`] record in the descriptor blob.
pub const MATERIAL_FRAME_SIZE: usize = 72;

pub(super) fn read_material(reader: &mut BinaryReader<'_>) -> Result<RawMaterial> {
    let texture = DescriptorOffset(reader.read_u32()?);
    let options = MaterialOptions::from_bits_truncate(reader.read_u16()?);
    let _option = reader.read_u32()?;
    let _power = reader.read_f32()?;
    let frames = DescriptorOffset(reader.read_u32()?);

    Ok(RawMaterial {
        texture,
        options,
        frames,
    })
}

pub(super) fn read_material_frame(reader: &mut BinaryReader<'_>) -> Result<MaterialFrame> {
    Ok(MaterialFrame {
        ambient: reader.read_color()?,
        diffuse: reader.read_color()?,
        specular: reader.read_color()?,
        opacity: reader.read_f32()?,
        texture_offset: reader.read_vec2()?,
        texture_rotation: reader.read_vec3()?,
    })
}
