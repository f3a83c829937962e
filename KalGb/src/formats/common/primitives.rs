//! Direct3D-style geometry records.
//!
//! All records are packed little-endian `f32` sequences.

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::Serialize;

use super::reader::BinaryReader;
use crate::error::Result;

/// RGBA color value (`D3DCOLORVALUE`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl BinaryReader<'_> {
    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Quaternion stored as `x, y, z, w`.
    pub fn read_quat(&mut self) -> Result<Quat> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let z = self.read_f32()?;
        let w = self.read_f32()?;
        Ok(Quat::from_xyzw(x, y, z, w))
    }

    /// 4x4 matrix stored row-major with row vectors (`_11 .. _44`).
    ///
    /// That memory order is exactly glam's column-major layout for the
    /// column-vector equivalent, so the floats are taken as-is.
    pub fn read_matrix4(&mut self) -> Result<Mat4> {
        let mut m = [0.0f32; 16];
        for value in &mut m {
            *value = self.read_f32()?;
        }
        Ok(Mat4::from_cols_array(&m))
    }

    pub fn read_color(&mut self) -> Result<Color> {
        Ok(Color {
            r: self.read_f32()?,
            g: self.read_f32()?,
            b: self.read_f32()?,
            a: self.read_f32()?,
        })
    }
}
