// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounds-checked read cursor over a received datagram.
//!
//! Every parse step in the crate goes through [`ReadCursor`]; raw offset
//! arithmetic never touches the buffer directly. Reads are all-or-nothing: a
//! read that would cross the end fails with [`CursorError`] and does not
//! advance.
//!
//! RTPS submessage bodies carry their own byte order (flags bit 0), so the
//! multi-byte reads take an explicit [`Endianness`] instead of baking one in.

use crate::error::CursorError;

/// Byte order of a submessage body, from the flags' low bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

impl Endianness {
    /// Decode from a submessage flags byte (bit 0 set = little-endian).
    pub fn from_flags(flags: u8) -> Self {
        if flags & crate::constants::FLAG_ENDIANNESS != 0 {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }
}

/// Generate endianness-parameterized read methods for primitive types.
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `CursorError` on overflow, offset unchanged)
/// 2. Converts bytes via `from_le_bytes`/`from_be_bytes` per the argument
/// 3. Advances the offset by the decoded width
macro_rules! impl_read {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self, endianness: Endianness) -> Result<$type, CursorError> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(match endianness {
                Endianness::Little => <$type>::from_le_bytes(bytes),
                Endianness::Big => <$type>::from_be_bytes(bytes),
            })
        }
    };
}

/// Immutable read cursor (bounds-checked, zero-copy).
pub struct ReadCursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> ReadCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Single octet; endianness-free.
    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        let byte = self.read_bytes(1)?;
        Ok(byte[0])
    }

    impl_read!(read_u16, u16, 2);
    impl_read!(read_u32, u32, 4);
    impl_read!(read_u64, u64, 8);
    impl_read!(read_i32, i32, 4);
    impl_read!(read_i64, i64, 8);

    /// Raw span of `len` bytes, borrowed from the underlying buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CursorError> {
        if self.offset + len > self.buffer.len() {
            return Err(CursorError {
                offset: self.offset,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// GUID-prefix-sized span (12 bytes), as a fixed array.
    pub fn read_guid_prefix(&mut self) -> Result<[u8; 12], CursorError> {
        let mut prefix = [0u8; 12];
        prefix.copy_from_slice(self.read_bytes(12)?);
        Ok(prefix)
    }

    /// Entity-id-sized span (4 bytes), as a fixed array.
    pub fn read_entity_id(&mut self) -> Result<[u8; 4], CursorError> {
        let mut id = [0u8; 4];
        id.copy_from_slice(self.read_bytes(4)?);
        Ok(id)
    }

    /// Skip `len` bytes without looking at them (bounds-checked).
    pub fn skip(&mut self, len: usize) -> Result<(), CursorError> {
        self.read_bytes(len).map(|_| ())
    }

    /// Skip pad bytes up to the next `alignment` boundary, relative to the
    /// cursor origin. Decoders run over a body-scoped cursor, so this is
    /// alignment relative to the submessage start per the wire padding rules.
    pub fn align(&mut self, alignment: usize) -> Result<(), CursorError> {
        if alignment <= 1 {
            return Ok(());
        }
        let mask = alignment - 1;
        let aligned = (self.offset + mask) & !mask;
        if aligned > self.buffer.len() {
            return Err(CursorError {
                offset: self.offset,
                needed: aligned - self.offset,
                remaining: self.remaining(),
            });
        }
        self.offset = aligned;
        Ok(())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    /// All bytes from the current offset to the end, without advancing.
    pub fn remainder(&self) -> &'a [u8] {
        &self.buffer[self.offset..]
    }
}
