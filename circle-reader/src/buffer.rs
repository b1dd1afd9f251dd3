//! # Byte Buffer
//!
//! Bounds-checked little-endian reads at absolute positions. Every position
//! is computed with checked arithmetic; anything past the end is reported as
//! [`ReaderError::MalformedBuffer`].

use crate::error::{ReaderError, Result};

/// Immutable view over a serialized model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteBuffer<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteBuffer<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Underlying bytes
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Borrow `len` bytes starting at `pos`
    pub fn slice(&self, pos: usize, len: usize) -> Result<&'a [u8]> {
        let end = pos
            .checked_add(len)
            .ok_or_else(|| ReaderError::out_of_bounds(pos, len, self.len()))?;
        self.bytes
            .get(pos..end)
            .ok_or_else(|| ReaderError::out_of_bounds(pos, len, self.len()))
    }

    /// Restrict the view to the first `len` bytes
    pub fn truncate(&self, len: usize) -> Result<Self> {
        Ok(Self::new(self.slice(0, len)?))
    }

    #[inline]
    fn read_array<const N: usize>(&self, pos: usize) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(pos, N)?);
        Ok(out)
    }

    pub fn read_u8(&self, pos: usize) -> Result<u8> {
        Ok(self.read_array::<1>(pos)?[0])
    }

    pub fn read_i8(&self, pos: usize) -> Result<i8> {
        Ok(self.read_u8(pos)? as i8)
    }

    /// Any non-zero byte is `true`
    pub fn read_bool(&self, pos: usize) -> Result<bool> {
        Ok(self.read_u8(pos)? != 0)
    }

    pub fn read_u16(&self, pos: usize) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array(pos)?))
    }

    pub fn read_i16(&self, pos: usize) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array(pos)?))
    }

    pub fn read_u32(&self, pos: usize) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array(pos)?))
    }

    pub fn read_i32(&self, pos: usize) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array(pos)?))
    }

    pub fn read_u64(&self, pos: usize) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array(pos)?))
    }

    pub fn read_i64(&self, pos: usize) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array(pos)?))
    }

    pub fn read_f32(&self, pos: usize) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array(pos)?))
    }

    pub fn read_f64(&self, pos: usize) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array(pos)?))
    }

    /// Follow a forward `uoffset_t` stored at `pos`
    pub fn read_uoffset(&self, pos: usize) -> Result<usize> {
        let rel = self.read_u32(pos)? as usize;
        let target = pos
            .checked_add(rel)
            .ok_or_else(|| ReaderError::out_of_bounds(pos, rel, self.len()))?;
        if target >= self.len() {
            return Err(ReaderError::out_of_bounds(target, 1, self.len()));
        }
        Ok(target)
    }

    /// Resolve the vtable of the table at `pos` (`pos - soffset_t`)
    pub fn read_vtable_position(&self, pos: usize) -> Result<usize> {
        let soffset = self.read_i32(pos)? as i64;
        let vtable = (pos as i64)
            .checked_sub(soffset)
            .filter(|vt| *vt >= 0 && (*vt as u64) < self.len() as u64)
            .ok_or_else(|| ReaderError::out_of_bounds(pos, 4, self.len()))?;
        Ok(vtable as usize)
    }
}

impl<'a> From<&'a [u8]> for ByteBuffer<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_reads_little_endian() {
        let bytes = [0x78, 0x56, 0x34, 0x12, 0xFF, 0x00, 0x80, 0x3F];
        let buf = ByteBuffer::new(&bytes);
        assert_eq!(buf.read_u32(0).unwrap(), 0x12345678);
        assert_eq!(buf.read_u16(0).unwrap(), 0x5678);
        assert_eq!(buf.read_i8(4).unwrap(), -1);
        assert!(buf.read_bool(4).unwrap());
        assert!(!buf.read_bool(5).unwrap());
        assert_eq!(buf.read_f32(4).unwrap().to_bits(), 0x3F80_00FF);
        assert_eq!(buf.read_u64(0).unwrap(), 0x3F80_00FF_1234_5678);
    }

    #[test]
    fn test_out_of_bounds_reads_fail() {
        let bytes = [0u8; 6];
        let buf = ByteBuffer::new(&bytes);
        assert!(buf.read_u32(2).is_ok());
        assert_eq!(
            buf.read_u32(3).unwrap_err(),
            ReaderError::out_of_bounds(3, 4, 6)
        );
        assert!(buf.read_u8(6).is_err());
        assert!(buf.read_u64(usize::MAX - 2).is_err());
        assert!(buf.slice(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_uoffset_must_land_inside() {
        // offset 4 -> target 4, offset 100 -> past end
        let bytes = [4, 0, 0, 0, 100, 0, 0, 0, 0];
        let buf = ByteBuffer::new(&bytes);
        assert_eq!(buf.read_uoffset(0).unwrap(), 4);
        assert!(buf.read_uoffset(4).is_err());
    }

    #[test]
    fn test_vtable_position() {
        // Table at 4 with soffset 4 -> vtable at 0
        let bytes = [6, 0, 4, 0, 4, 0, 0, 0];
        let buf = ByteBuffer::new(&bytes);
        assert_eq!(buf.read_vtable_position(4).unwrap(), 0);

        // soffset pointing before the start of the buffer
        let bytes = [0, 0, 0, 0, 16, 0, 0, 0];
        let buf = ByteBuffer::new(&bytes);
        assert!(buf.read_vtable_position(4).is_err());

        // negative soffset pointing past the end
        let bytes = [0xF0, 0xFF, 0xFF, 0xFF];
        let buf = ByteBuffer::new(&bytes);
        assert!(buf.read_vtable_position(0).is_err());
    }

    #[test]
    fn test_truncate() {
        let bytes = [1u8, 2, 3, 4];
        let buf = ByteBuffer::new(&bytes);
        assert_eq!(buf.truncate(2).unwrap().len(), 2);
        assert!(buf.truncate(5).is_err());
    }
}
