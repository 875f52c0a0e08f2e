//! # Serial Buffer
//!
//! Fixed-size serialization scratch used by the RPC framing around the
//! store. A [`SerialBuffer`] wraps a caller-owned byte buffer with two
//! independent cursors: `write_idx` advances as values are appended,
//! `read_idx` as they are consumed. Positional variants (`*_at`) address an
//! absolute offset and leave both cursors untouched.
//!
//! Multi-byte values travel in network byte order (big-endian) - unlike the
//! index pages, which are host-endian, frames cross machines.
//!
//! Every access is bounds-checked against the buffer; a failed access
//! returns [`SerialError::Overrun`] and changes nothing. No allocation is
//! performed by any method.

use thiserror::Error;

/// Errors raised by [`SerialBuffer`] accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SerialError {
    /// The access would run past the end of the buffer.
    #[error("serial buffer overrun")]
    Overrun,
}

type Result<T> = std::result::Result<T, SerialError>;

/// Bounds-checked cursor pair over a fixed serialization buffer.
pub struct SerialBuffer<'a> {
    buf: &'a mut [u8],
    write_idx: usize,
    read_idx: usize,
}

macro_rules! put_get {
    ($put:ident, $put_at:ident, $get:ident, $get_at:ident, $ty:ty) => {
        /// Appends the value at the write cursor.
        pub fn $put(&mut self, v: $ty) -> Result<()> {
            self.put_slice(&v.to_be_bytes())
        }

        /// Stores the value at an absolute offset; cursors are unchanged.
        pub fn $put_at(&mut self, v: $ty, idx: usize) -> Result<()> {
            self.put_slice_at(&v.to_be_bytes(), idx)
        }

        /// Consumes a value at the read cursor.
        pub fn $get(&mut self) -> Result<$ty> {
            let bytes = self.take(size_of::<$ty>())?;
            // INVARIANT: take returned exactly size_of bytes
            Ok(<$ty>::from_be_bytes(bytes.try_into().unwrap()))
        }

        /// Reads a value at an absolute offset; cursors are unchanged.
        pub fn $get_at(&self, idx: usize) -> Result<$ty> {
            let bytes = self.peek_at(idx, size_of::<$ty>())?;
            Ok(<$ty>::from_be_bytes(bytes.try_into().unwrap()))
        }
    };
}

impl<'a> SerialBuffer<'a> {
    /// Wraps `buf` with both cursors at zero.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            write_idx: 0,
            read_idx: 0,
        }
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Next byte offset to be written.
    pub fn write_idx(&self) -> usize {
        self.write_idx
    }

    /// Next byte offset to be read.
    pub fn read_idx(&self) -> usize {
        self.read_idx
    }

    fn put_slice(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.write_idx.checked_add(bytes.len()).ok_or(SerialError::Overrun)?;
        if end > self.buf.len() {
            return Err(SerialError::Overrun);
        }
        self.buf[self.write_idx..end].copy_from_slice(bytes);
        self.write_idx = end;
        Ok(())
    }

    fn put_slice_at(&mut self, bytes: &[u8], idx: usize) -> Result<()> {
        let end = idx.checked_add(bytes.len()).ok_or(SerialError::Overrun)?;
        if end > self.buf.len() {
            return Err(SerialError::Overrun);
        }
        self.buf[idx..end].copy_from_slice(bytes);
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        let end = self.read_idx.checked_add(n).ok_or(SerialError::Overrun)?;
        if end > self.buf.len() {
            return Err(SerialError::Overrun);
        }
        let bytes = &self.buf[self.read_idx..end];
        self.read_idx = end;
        Ok(bytes)
    }

    fn peek_at(&self, idx: usize, n: usize) -> Result<&[u8]> {
        let end = idx.checked_add(n).ok_or(SerialError::Overrun)?;
        if end > self.buf.len() {
            return Err(SerialError::Overrun);
        }
        Ok(&self.buf[idx..end])
    }

    put_get!(put_u8, put_u8_at, get_u8, get_u8_at, u8);
    put_get!(put_i8, put_i8_at, get_i8, get_i8_at, i8);
    put_get!(put_u16, put_u16_at, get_u16, get_u16_at, u16);
    put_get!(put_i16, put_i16_at, get_i16, get_i16_at, i16);
    put_get!(put_u32, put_u32_at, get_u32, get_u32_at, u32);
    put_get!(put_i32, put_i32_at, get_i32, get_i32_at, i32);
}
