//! # Table Accessor
//!
//! Lazy, vtable-driven field access.
//!
//! ```text
//! vtable:  [vtable_len:u16][table_len:u16][slot 0:u16][slot 1:u16]...
//! table:   [soffset:i32 -> vtable][inline fields...]
//! vector:  [len:u32][elem 0][elem 1]...
//! string:  [len:u32][utf-8 bytes][NUL, not required]
//! ```
//!
//! Nothing is parsed up front: a [`Table`] is a `(buffer, position)` pair
//! and every getter walks the vtable again.

use crate::buffer::ByteBuffer;
use crate::error::{ReaderError, Result};
use circle_schema::{VOffset, OFFSET_SIZE, VOFFSET_SIZE};
use std::fmt;
use std::marker::PhantomData;

/// Types that can be read at a position, inline or through an offset
pub trait Follow<'a>: Sized {
    /// Size of one element when stored in a vector
    const STRIDE: usize;

    fn follow(buf: ByteBuffer<'a>, pos: usize) -> Result<Self>;
}

macro_rules! impl_follow_scalar {
    ($($ty:ty => $read:ident),* $(,)?) => {
        $(
            impl<'a> Follow<'a> for $ty {
                const STRIDE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn follow(buf: ByteBuffer<'a>, pos: usize) -> Result<Self> {
                    buf.$read(pos)
                }
            }
        )*
    };
}

impl_follow_scalar! {
    u8 => read_u8,
    i8 => read_i8,
    bool => read_bool,
    u16 => read_u16,
    i16 => read_i16,
    u32 => read_u32,
    i32 => read_i32,
    u64 => read_u64,
    i64 => read_i64,
    f32 => read_f32,
    f64 => read_f64,
}

impl<'a> Follow<'a> for &'a str {
    const STRIDE: usize = OFFSET_SIZE;

    fn follow(buf: ByteBuffer<'a>, pos: usize) -> Result<Self> {
        read_string(buf, buf.read_uoffset(pos)?)
    }
}

/// Read a length-prefixed string located at `pos`
pub fn read_string(buf: ByteBuffer<'_>, pos: usize) -> Result<&'_ str> {
    let len = buf.read_u32(pos)? as usize;
    let bytes = buf.slice(pos + OFFSET_SIZE, len)?;
    std::str::from_utf8(bytes).map_err(|_| ReaderError::InvalidUtf8 { offset: pos })
}

// ============================================================================
// Table
// ============================================================================

/// A table inside the buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table<'a> {
    buf: ByteBuffer<'a>,
    pos: usize,
}

impl<'a> Table<'a> {
    pub fn new(buf: ByteBuffer<'a>, pos: usize) -> Self {
        Self { buf, pos }
    }

    #[inline]
    pub fn buffer(&self) -> ByteBuffer<'a> {
        self.buf
    }

    /// Absolute start of the table
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Absolute start of the vtable
    pub fn vtable(&self) -> Result<usize> {
        self.buf.read_vtable_position(self.pos)
    }

    /// Declared vtable length in bytes, header included
    pub fn vtable_len(&self) -> Result<u16> {
        self.buf.read_u16(self.vtable()?)
    }

    /// Absolute position of a field's payload, `None` if absent
    ///
    /// Slots past the vtable's declared length are absent: the producer was
    /// built against an older schema.
    pub fn field_offset(&self, voffset: VOffset) -> Result<Option<usize>> {
        let vtable = self.vtable()?;
        let vtable_len = self.buf.read_u16(vtable)? as usize;
        if voffset as usize + VOFFSET_SIZE > vtable_len {
            return Ok(None);
        }

        let rel = self.buf.read_u16(vtable + voffset as usize)?;
        if rel == 0 {
            return Ok(None);
        }
        Ok(Some(self.pos + rel as usize))
    }

    /// True if the slot is present in this table
    pub fn has_field(&self, voffset: VOffset) -> Result<bool> {
        Ok(self.field_offset(voffset)?.is_some())
    }

    /// Inline scalar field
    pub fn get<T: Follow<'a>>(&self, voffset: VOffset, default: T) -> Result<T> {
        match self.field_offset(voffset)? {
            Some(pos) => T::follow(self.buf, pos),
            None => Ok(default),
        }
    }

    /// Nested table field
    pub fn get_table(&self, voffset: VOffset) -> Result<Option<Table<'a>>> {
        self.field_offset(voffset)?
            .map(|pos| Table::follow(self.buf, pos))
            .transpose()
    }

    /// String field
    pub fn get_str(&self, voffset: VOffset) -> Result<Option<&'a str>> {
        self.field_offset(voffset)?
            .map(|pos| <&'a str>::follow(self.buf, pos))
            .transpose()
    }

    /// Vector field
    pub fn get_vector<T: Follow<'a>>(&self, voffset: VOffset) -> Result<Option<Vector<'a, T>>> {
        match self.field_offset(voffset)? {
            Some(pos) => {
                let start = self.buf.read_uoffset(pos)?;
                Ok(Some(Vector::at(self.buf, start)?))
            }
            None => Ok(None),
        }
    }

    /// Vector field, empty when absent
    pub fn get_vector_or_empty<T: Follow<'a>>(&self, voffset: VOffset) -> Result<Vector<'a, T>> {
        Ok(self
            .get_vector(voffset)?
            .unwrap_or_else(|| Vector::empty(self.buf)))
    }
}

impl<'a> Follow<'a> for Table<'a> {
    const STRIDE: usize = OFFSET_SIZE;

    fn follow(buf: ByteBuffer<'a>, pos: usize) -> Result<Self> {
        Ok(Table::new(buf, buf.read_uoffset(pos)?))
    }
}

/// Declare a typed view over a [`Table`]
macro_rules! table_view {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $name<'a> {
            table: $crate::table::Table<'a>,
        }

        impl<'a> $name<'a> {
            pub fn new(table: $crate::table::Table<'a>) -> Self {
                Self { table }
            }

            /// Underlying table
            #[inline]
            pub fn table(&self) -> $crate::table::Table<'a> {
                self.table
            }
        }

        impl<'a> $crate::table::Follow<'a> for $name<'a> {
            const STRIDE: usize = circle_schema::OFFSET_SIZE;

            fn follow(
                buf: $crate::buffer::ByteBuffer<'a>,
                pos: usize,
            ) -> $crate::error::Result<Self> {
                Ok(Self::new(<$crate::table::Table<'a> as $crate::table::Follow<'a>>::follow(buf, pos)?))
            }
        }
    };
}

pub(crate) use table_view;

// ============================================================================
// Vector
// ============================================================================

/// Length-prefixed vector; the whole extent is bounds checked on creation
pub struct Vector<'a, T> {
    buf: ByteBuffer<'a>,
    start: usize,
    len: usize,
    _marker: PhantomData<T>,
}

impl<'a, T> Clone for Vector<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Vector<'a, T> {}

impl<'a, T> fmt::Debug for Vector<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("start", &self.start)
            .field("len", &self.len)
            .finish()
    }
}

impl<'a, T: Follow<'a>> Vector<'a, T> {
    /// Vector whose length prefix sits at `pos`
    pub fn at(buf: ByteBuffer<'a>, pos: usize) -> Result<Self> {
        let len = buf.read_u32(pos)? as usize;
        let start = pos + OFFSET_SIZE;
        let extent = len
            .checked_mul(T::STRIDE)
            .ok_or_else(|| ReaderError::out_of_bounds(start, usize::MAX, buf.len()))?;
        buf.slice(start, extent)?;
        Ok(Self {
            buf,
            start,
            len,
            _marker: PhantomData,
        })
    }

    pub fn empty(buf: ByteBuffer<'a>) -> Self {
        Self {
            buf,
            start: 0,
            len: 0,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element `index`
    pub fn get(&self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(ReaderError::IndexOutOfRange {
                what: "vector element",
                index,
                len: self.len,
            });
        }
        T::follow(self.buf, self.start + index * T::STRIDE)
    }

    pub fn iter(&self) -> VectorIter<'a, T> {
        VectorIter {
            vector: *self,
            index: 0,
        }
    }

    /// Materialize all elements
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.iter().collect()
    }
}

impl<'a> Vector<'a, u8> {
    /// Raw bytes of a `[ubyte]` vector
    pub fn bytes(&self) -> &'a [u8] {
        // Extent was checked in `at`; an empty vector has no bytes
        self.buf
            .as_bytes()
            .get(self.start..self.start + self.len)
            .unwrap_or(&[])
    }
}

/// Iterator over a [`Vector`]
pub struct VectorIter<'a, T> {
    vector: Vector<'a, T>,
    index: usize,
}

impl<'a, T: Follow<'a>> Iterator for VectorIter<'a, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.vector.len {
            return None;
        }
        let item = self.vector.get(self.index);
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Follow<'a>> ExactSizeIterator for VectorIter<'a, T> {}

impl<'a, T: Follow<'a>> IntoIterator for Vector<'a, T> {
    type Item = Result<T>;
    type IntoIter = VectorIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_u16(out: &mut Vec<u8>, v: u16) {
        out.extend_from_slice(&v.to_le_bytes());
    }

    fn push_u32(out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&v.to_le_bytes());
    }

    /// vtable @0 (2 slots), table @8: i32 42 and a vector of [1, 2, 3]
    fn two_field_table(vector_len: u32) -> Vec<u8> {
        let mut out = Vec::new();
        push_u16(&mut out, 8); // vtable_len
        push_u16(&mut out, 12); // table_len
        push_u16(&mut out, 4); // slot 0
        push_u16(&mut out, 8); // slot 1
        push_u32(&mut out, 8); // soffset: 8 - 0
        push_u32(&mut out, 42); // slot 0 payload @12
        push_u32(&mut out, 4); // slot 1 uoffset @16 -> 20
        push_u32(&mut out, vector_len); // @20
        for v in [1u32, 2, 3] {
            push_u32(&mut out, v);
        }
        out
    }

    #[test]
    fn test_field_offsets() {
        let bytes = two_field_table(3);
        let table = Table::new(ByteBuffer::new(&bytes), 8);
        assert_eq!(table.vtable().unwrap(), 0);
        assert_eq!(table.vtable_len().unwrap(), 8);
        assert_eq!(table.field_offset(4).unwrap(), Some(12));
        assert_eq!(table.field_offset(6).unwrap(), Some(16));
    }

    #[test]
    fn test_slot_past_vtable_is_absent() {
        let bytes = two_field_table(3);
        let table = Table::new(ByteBuffer::new(&bytes), 8);
        assert_eq!(table.field_offset(8).unwrap(), None);
        assert_eq!(table.field_offset(200).unwrap(), None);
        assert_eq!(table.get::<i32>(8, 7).unwrap(), 7);
        assert!(table.get_vector::<i32>(10).unwrap().is_none());
        assert!(table.get_str(12).unwrap().is_none());
    }

    #[test]
    fn test_zero_entry_is_absent() {
        let mut bytes = two_field_table(3);
        bytes[6] = 0; // clear slot 1
        let table = Table::new(ByteBuffer::new(&bytes), 8);
        assert_eq!(table.field_offset(6).unwrap(), None);
        assert!(table.get_vector_or_empty::<i32>(6).unwrap().is_empty());
    }

    #[test]
    fn test_scalar_and_vector_fields() {
        let bytes = two_field_table(3);
        let table = Table::new(ByteBuffer::new(&bytes), 8);
        assert_eq!(table.get::<i32>(4, 0).unwrap(), 42);

        let vector = table.get_vector::<i32>(6).unwrap().unwrap();
        assert_eq!(vector.len(), 3);
        assert_eq!(vector.get(2).unwrap(), 3);
        assert_eq!(vector.to_vec().unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            vector.get(3),
            Err(ReaderError::IndexOutOfRange { index: 3, len: 3, .. })
        ));
    }

    #[test]
    fn test_vector_length_is_bounds_checked() {
        let bytes = two_field_table(4);
        let table = Table::new(ByteBuffer::new(&bytes), 8);
        assert!(matches!(
            table.get_vector::<i32>(6),
            Err(ReaderError::MalformedBuffer { .. })
        ));

        let bytes = two_field_table(u32::MAX);
        let table = Table::new(ByteBuffer::new(&bytes), 8);
        assert!(table.get_vector::<i64>(6).unwrap_err().is_malformed());
    }

    #[test]
    fn test_byte_vector_view() {
        let bytes = two_field_table(3);
        let table = Table::new(ByteBuffer::new(&bytes), 8);
        // 3 bytes of the first element
        let vector = table.get_vector::<u8>(6).unwrap().unwrap();
        assert_eq!(vector.bytes(), &[1, 0, 0]);
    }

    #[test]
    fn test_string_field() {
        let mut out = Vec::new();
        push_u16(&mut out, 6); // vtable_len
        push_u16(&mut out, 8); // table_len
        push_u16(&mut out, 4); // slot 0
        push_u16(&mut out, 0); // padding
        push_u32(&mut out, 8); // table @8, soffset 8
        push_u32(&mut out, 4); // @12 -> string @16
        push_u32(&mut out, 5); // len
        out.extend_from_slice(b"input\0");

        let table = Table::new(ByteBuffer::new(&out), 8);
        assert_eq!(table.get_str(4).unwrap(), Some("input"));

        // Length runs past the end
        let mut truncated = out.clone();
        truncated[16] = 9;
        let table = Table::new(ByteBuffer::new(&truncated), 8);
        assert!(table.get_str(4).unwrap_err().is_malformed());

        // Bytes are not UTF-8
        let mut bad = out;
        bad[20] = 0xFF;
        let table = Table::new(ByteBuffer::new(&bad), 8);
        assert_eq!(
            table.get_str(4).unwrap_err(),
            ReaderError::InvalidUtf8 { offset: 16 }
        );
    }

    #[test]
    fn test_table_position_out_of_range() {
        let bytes = two_field_table(3);
        let table = Table::new(ByteBuffer::new(&bytes), 34);
        assert!(table.field_offset(4).unwrap_err().is_malformed());
    }
}
