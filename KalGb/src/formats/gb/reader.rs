//! GB file reading
//!
//! Two passes: the main pass walks every section in file order and keeps
//! descriptor references as offsets, then the descriptor blob at the end of
//! the file is used to resolve them.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use super::animation::{read_animation, read_transformation};
use super::collision::read_collision;
use super::descriptor::{Descriptor, resolve};
use super::header::GbHeader;
use super::material::read_material;
use super::mesh::read_mesh;
use super::raw::RawScene;
use super::skeleton::read_skeleton;
use super::types::Scene;
use crate::cipher::{NAME_BLOCK_KEY, NameCipher};
use crate::error::{Error, Result};
use crate::formats::common::BinaryReader;

/// Configurable GB decoder over an in-memory file.
///
/// ```
/// use kalgb::formats::gb::GbReader;
///
/// // A version 8 file with no sections and an empty descriptor blob
/// let mut data = vec![8u8, 0, 0, 0];
/// data.extend_from_slice(&[0u8; 35]);
/// let scene = GbReader::new(&data).read()?;
/// assert!(scene.meshes.is_empty());
/// # Ok::<(), kalgb::Error>(())
/// ```
pub struct GbReader<'a> {
    data: &'a [u8],
    cipher: Option<&'a dyn NameCipher>,
}

impl<'a> GbReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cipher: None }
    }

    /// Decrypt the version 12 name block with `cipher`.
    ///
    /// Without a cipher the block is kept raw in the header and
    /// [`Scene::name`] stays `None`.
    #[must_use]
    pub fn with_name_cipher(mut self, cipher: &'a dyn NameCipher) -> Self {
        self.cipher = Some(cipher);
        self
    }

    /// Decode and resolve the whole file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] for revisions outside 8-12,
    /// [`Error::TrailingBytes`] if anything follows the descriptor blob, and
    /// the validation or range error of the first section that fails.
    pub fn read(&self) -> Result<Scene> {
        let mut reader = BinaryReader::new(self.data);
        let raw = read_sections(&mut reader)?;

        let descriptor_size = raw.header.descriptor_size as usize;
        let descriptor = Descriptor::new(reader.read_bytes(descriptor_size)?);

        let trailing = reader.remaining();
        if trailing > 0 {
            return Err(Error::TrailingBytes { count: trailing });
        }

        let name = self.decrypt_name(&raw.header);
        let scene = resolve(raw, &descriptor, name)?;

        tracing::debug!(
            "Decoded GB v{}: {}",
            scene.version,
            scene.content_info().describe()
        );
        Ok(scene)
    }

    fn decrypt_name(&self, header: &GbHeader) -> Option<String> {
        let block = header.name_block.as_deref()?;
        let cipher = self.cipher?;
        let Some(plain) = cipher.decrypt(NAME_BLOCK_KEY, block) else {
            tracing::warn!("Name cipher has no table for key {}", NAME_BLOCK_KEY);
            return None;
        };
        let end = plain.iter().position(|&b| b == 0).unwrap_or(plain.len());
        Some(String::from_utf8_lossy(&plain[..end]).into_owned())
    }
}

/// Decode a GB file from bytes with default settings.
///
/// # Errors
///
/// See [`GbReader::read`].
pub fn parse_gb_bytes(data: &[u8]) -> Result<Scene> {
    GbReader::new(data).read()
}

/// Main pass: every section between the header and the descriptor blob.
fn read_sections(reader: &mut BinaryReader<'_>) -> Result<RawScene> {
    let header = GbHeader::parse(reader)?;
    tracing::debug!(
        "GB header v{}: {} meshes, {} materials x {} frames, {} animations, descriptor {} bytes, collision {} bytes",
        header.version,
        header.mesh_count,
        header.material_count,
        header.material_frame_count,
        header.animation_count,
        header.descriptor_size,
        header.collision_size
    );

    let skeleton = if header.has_skeleton() {
        Some(read_skeleton(reader, header.bone_count)?)
    } else {
        None
    };

    let materials = (0..header.material_count)
        .map(|_| read_material(reader))
        .collect::<Result<Vec<_>>>()?;

    let meshes = (0..usize::from(header.mesh_count))
        .map(|index| read_mesh(reader, header.version, index))
        .collect::<Result<Vec<_>>>()?;

    let animations = (0..usize::from(header.animation_count))
        .map(|index| read_animation(reader, header.bone_count, header.transformation_count, index))
        .collect::<Result<Vec<_>>>()?;

    let transformations = (0..header.transformation_count)
        .map(|_| read_transformation(reader))
        .collect::<Result<Vec<_>>>()?;

    let collision = if header.collision_size > 0 {
        Some(read_collision(reader, header.bounding_box)?)
    } else {
        None
    };

    Ok(RawScene {
        header,
        skeleton,
        materials,
        meshes,
        animations,
        transformations,
        collision,
    })
}
