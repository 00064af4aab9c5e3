//! Byte cursor and byte buffer used by every codec.

use super::{SerdeError, SerdeResult};

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A cursor over a byte slice.
///
/// Reads advance the position; a read that cannot be satisfied fails with
/// `IncompleteData` and leaves the position unchanged.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A slice of length `n`, or `IncompleteData` if fewer bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> SerdeResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(SerdeError::IncompleteData {
                expected: n,
                got: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> SerdeResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut arr = [0u8; N];
        arr.copy_from_slice(bytes);
        Ok(arr)
    }

    pub fn read_u8(&mut self) -> SerdeResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Return the next byte without consuming it.
    pub fn peek_u8(&self) -> SerdeResult<u8> {
        self.data.get(self.pos).copied().ok_or(SerdeError::IncompleteData {
            expected: 1,
            got: 0,
        })
    }

    pub fn read_i32_be(&mut self) -> SerdeResult<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i64_be(&mut self) -> SerdeResult<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The unread tail of the input.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// An append-only byte buffer.
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    pub fn write_i32_be(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    pub fn write_i64_be(&mut self, val: i64) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_advances() {
        let data = [1u8, 2, 3, 4, 5];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.peek_u8().unwrap(), 2);
        assert_eq!(r.read_bytes(2).unwrap(), &[2, 3]);
        assert_eq!(r.position(), 3);
        assert_eq!(r.remaining(), 2);
        assert_eq!(r.rest(), &[4, 5]);
    }

    #[test]
    fn test_short_read_reports_sizes_and_keeps_position() {
        let data = [1u8, 2];
        let mut r = ByteReader::new(&data);
        assert_eq!(
            r.read_bytes(4),
            Err(SerdeError::IncompleteData { expected: 4, got: 2 })
        );
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn test_big_endian_integers() {
        let mut w = ByteWriter::new();
        w.write_i32_be(0x0102_0304);
        w.write_i64_be(-2);
        assert_eq!(
            w.as_bytes(),
            &[1, 2, 3, 4, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe]
        );
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_i32_be().unwrap(), 0x0102_0304);
        assert_eq!(r.read_i64_be().unwrap(), -2);
    }
}
