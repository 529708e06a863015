use crate::error::TagDecodeError;
use byteorder::{BigEndian, ByteOrder};

/// Position-tracked view over a decoded tag stream.
///
/// All multi-byte reads are big-endian. A read that would run past the end
/// of the buffer fails with `OutOfBounds` and leaves the position untouched.
#[derive(Debug, Clone)]
pub struct TagCursor<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> TagCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        TagCursor {
            buffer,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Bytes left between the position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    fn out_of_bounds(&self, requested: usize) -> TagDecodeError {
        TagDecodeError::OutOfBounds {
            position: self.position,
            requested,
            length: self.buffer.len(),
        }
    }

    /// Returns the next `count` bytes and advances past them.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], TagDecodeError> {
        if count > self.remaining() {
            return Err(self.out_of_bounds(count));
        }

        let start = self.position;
        self.position += count;

        Ok(&self.buffer[start..self.position])
    }

    pub fn read_u8(&mut self) -> Result<u8, TagDecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, TagDecodeError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, TagDecodeError> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, TagDecodeError> {
        Ok(BigEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, TagDecodeError> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, TagDecodeError> {
        Ok(BigEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64, TagDecodeError> {
        Ok(BigEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, TagDecodeError> {
        Ok(BigEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, TagDecodeError> {
        Ok(BigEndian::read_f64(self.read_bytes(8)?))
    }

    /// Advances `count` bytes forward without reading them.
    pub fn skip(&mut self, count: usize) -> Result<(), TagDecodeError> {
        self.read_bytes(count).map(|_| ())
    }

    /// Moves the position relative to where it is now.
    pub fn seek(&mut self, delta: isize) -> Result<(), TagDecodeError> {
        if delta >= 0 {
            return self.skip(delta as usize);
        }

        let back = delta.unsigned_abs();

        if back > self.position {
            return Err(self.out_of_bounds(back));
        }

        self.position -= back;
        Ok(())
    }

    /// Moves the position to `position` bytes from the buffer start.
    ///
    /// Seeking to the very end is allowed, a following read will fail.
    pub fn seek_absolute(&mut self, position: usize) -> Result<(), TagDecodeError> {
        if position > self.buffer.len() {
            return Err(TagDecodeError::OutOfBounds {
                position,
                requested: 0,
                length: self.buffer.len(),
            });
        }

        self.position = position;
        Ok(())
    }
}
