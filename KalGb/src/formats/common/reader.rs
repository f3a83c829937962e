//! Bounded little-endian cursor over an in-memory buffer.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::io::{self, Cursor};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};

/// Sequential reader over a fixed byte buffer.
///
/// Every read is bounds-checked up front, so a short buffer surfaces as
/// [`Error::UnexpectedEof`] with the failing offset instead of an opaque IO error.
pub struct BinaryReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> BinaryReader<'a> {
    /// Create a reader positioned at offset 0.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Current byte offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Total length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes left between the cursor and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    /// Move the cursor to an absolute offset. Seeking to `len()` is allowed.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.len() {
            return Err(Error::UnexpectedEof {
                offset,
                need: 0,
                remaining: 0,
            });
        }
        self.cursor.set_position(offset as u64);
        Ok(())
    }

    fn ensure(&self, need: usize) -> Result<()> {
        let remaining = self.remaining();
        if need > remaining {
            return Err(Error::UnexpectedEof {
                offset: self.position(),
                need,
                remaining,
            });
        }
        Ok(())
    }

    fn read_with<T>(
        &mut self,
        need: usize,
        read: impl FnOnce(&mut Cursor<&'a [u8]>) -> io::Result<T>,
    ) -> Result<T> {
        self.ensure(need)?;
        let offset = self.position();
        read(&mut self.cursor).map_err(|_| Error::UnexpectedEof {
            offset,
            need,
            remaining: 0,
        })
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_with(1, |c| c.read_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_with(2, |c| c.read_u16::<LittleEndian>())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_with(4, |c| c.read_u32::<LittleEndian>())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_with(4, |c| c.read_i32::<LittleEndian>())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_with(4, |c| c.read_f32::<LittleEndian>())
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let start = self.position();
        let data: &'a [u8] = *self.cursor.get_ref();
        self.cursor.set_position((start + n) as u64);
        Ok(&data[start..start + n])
    }

    /// Read a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read `N` consecutive little-endian `u16` values.
    pub fn read_u16_array<const N: usize>(&mut self) -> Result<[u16; N]> {
        self.ensure(N * 2)?;
        let mut out = [0u16; N];
        for value in &mut out {
            *value = self.read_u16()?;
        }
        Ok(out)
    }

    /// Read `count` little-endian `u16` values into a vector.
    pub fn read_u16_vec(&mut self, count: usize) -> Result<Vec<u16>> {
        self.ensure(count * 2)?;
        (0..count).map(|_| self.read_u16()).collect()
    }

    /// Advance the cursor without inspecting the bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    /// Read a zero-terminated byte string without the terminator.
    ///
    /// Returns `None` when no terminator exists before the end of the buffer;
    /// the cursor is left untouched in that case.
    pub fn read_cstring(&mut self) -> Option<&'a [u8]> {
        let start = self.position();
        let data: &'a [u8] = *self.cursor.get_ref();
        let rest = data.get(start..)?;
        let len = rest.iter().position(|&b| b == 0)?;
        self.cursor.set_position((start + len + 1) as u64);
        Some(&rest[..len])
    }
}
