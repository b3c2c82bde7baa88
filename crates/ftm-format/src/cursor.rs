//! Bounds-checked sequential reader over an in-memory module buffer.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{DecodeError, Result};

/// Sequential little-endian reader.
///
/// A cursor may be a window onto a larger buffer (see [`ByteCursor::split_off`]);
/// [`ByteCursor::position`] always reports the absolute offset in the original
/// buffer so errors point at the right byte.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            base: 0,
        }
    }

    /// Absolute offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    /// Absolute offset one past the last readable byte.
    pub fn end(&self) -> usize {
        self.base + self.data.len()
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Look at the next `n` bytes without consuming them.
    pub fn peek(&self, n: usize) -> Option<&'a [u8]> {
        self.data.get(self.pos..self.pos.checked_add(n)?)
    }

    /// Consume exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(DecodeError::OutOfBounds {
                offset: self.position(),
                wanted: n,
                available,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Consume exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    /// Read one byte and split it into bit fields, most significant first.
    ///
    /// `widths` must sum to 8. `read_bitfield([4, 4])` yields `[high, low]` nibbles.
    pub fn read_bitfield<const N: usize>(&mut self, widths: [u32; N]) -> Result<[u8; N]> {
        debug_assert_eq!(widths.iter().sum::<u32>(), 8, "bit fields must cover one byte");
        let byte = self.read_u8()?;
        let mut fields = [0u8; N];
        let mut shift = 8u32;
        for (field, width) in fields.iter_mut().zip(widths) {
            shift -= width;
            let mask = (1u16 << width) - 1;
            *field = ((u16::from(byte) >> shift) & mask) as u8;
        }
        Ok(fields)
    }

    /// Read a fixed-width, NUL-padded text field.
    pub fn read_text(&mut self, len: usize) -> Result<String> {
        Ok(extract_string(self.read_bytes(len)?))
    }

    /// Detach the next `len` bytes as an independent cursor and advance past them.
    pub fn split_off(&mut self, len: usize) -> Result<ByteCursor<'a>> {
        let base = self.position();
        let data = self.read_bytes(len)?;
        Ok(ByteCursor { data, pos: 0, base })
    }
}

/// Extract a NUL-terminated or NUL-padded string from a byte slice.
pub(crate) fn extract_string(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}
