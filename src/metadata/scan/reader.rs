//! Bounds-checked reads over a byte buffer.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    #[error("not enough bytes: {needed} at offset {offset} exceeds buffer of {len}")]
    NotEnoughBytes {
        offset: usize,
        needed: usize,
        len: usize,
    },
}

/// Read-only view with explicit-endianness accessors. Every accessor returns
/// [`ScanError::NotEnoughBytes`] instead of panicking on a short buffer.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn bytes(&self, offset: usize, count: usize) -> Result<&'a [u8], ScanError> {
        offset
            .checked_add(count)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(ScanError::NotEnoughBytes {
                offset,
                needed: count,
                len: self.data.len(),
            })
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], ScanError> {
        let slice = self.bytes(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    pub fn u8(&self, offset: usize) -> Result<u8, ScanError> {
        Ok(self.array::<1>(offset)?[0])
    }

    pub fn u16_be(&self, offset: usize) -> Result<u16, ScanError> {
        self.array(offset).map(u16::from_be_bytes)
    }

    pub fn u16_le(&self, offset: usize) -> Result<u16, ScanError> {
        self.array(offset).map(u16::from_le_bytes)
    }

    pub fn u32_be(&self, offset: usize) -> Result<u32, ScanError> {
        self.array(offset).map(u32::from_be_bytes)
    }

    pub fn u32_le(&self, offset: usize) -> Result<u32, ScanError> {
        self.array(offset).map(u32::from_le_bytes)
    }

    pub fn i32_le(&self, offset: usize) -> Result<i32, ScanError> {
        self.array(offset).map(i32::from_le_bytes)
    }

    /// Four-byte chunk/FourCC tag.
    pub fn tag(&self, offset: usize) -> Result<[u8; 4], ScanError> {
        self.array(offset)
    }

    /// `u16` in the given byte order.
    pub fn u16_with(&self, offset: usize, big_endian: bool) -> Result<u16, ScanError> {
        if big_endian {
            self.u16_be(offset)
        } else {
            self.u16_le(offset)
        }
    }

    /// `u32` in the given byte order.
    pub fn u32_with(&self, offset: usize, big_endian: bool) -> Result<u32, ScanError> {
        if big_endian {
            self.u32_be(offset)
        } else {
            self.u32_le(offset)
        }
    }
}
