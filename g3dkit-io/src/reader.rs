//! Bounds-checked little-endian reader over an in-memory buffer
//!
//! Every read names the field it is reading so that a truncated file reports
//! exactly which field ran past the end and at which byte offset.

use crate::error::DecodeError;
use byteorder::{ByteOrder, LittleEndian};
use g3dkit_core::{FixedName, Point3f, TexCoord, Vector3f, NAME_FIELD_LEN};

/// Cursor over a borrowed byte buffer
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Check if every byte has been consumed
    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Read a slice of bytes from the current position
    pub fn read_slice(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.position,
                field,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Read `count` elements of `width` bytes each as one slice
    fn read_block(&mut self, count: usize, width: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        let len = count.checked_mul(width).ok_or(DecodeError::Truncated {
            offset: self.position,
            field,
            needed: usize::MAX,
            available: self.remaining(),
        })?;
        self.read_slice(len, field)
    }

    /// Consume and return everything after the current position
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.position..];
        self.position = self.data.len();
        slice
    }

    /// Read a fixed-size byte array
    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let slice = self.read_slice(N, field)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Read a single byte
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.read_slice(1, field)?[0])
    }

    /// Read a little-endian u16
    pub fn read_u16(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        Ok(LittleEndian::read_u16(self.read_slice(2, field)?))
    }

    /// Read a little-endian u32
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        Ok(LittleEndian::read_u32(self.read_slice(4, field)?))
    }

    /// Read a little-endian u32 used as a count
    pub fn read_count(&mut self, field: &'static str) -> Result<usize, DecodeError> {
        Ok(self.read_u32(field)? as usize)
    }

    /// Read a 64-byte null-padded name field
    pub fn read_name(&mut self, field: &'static str) -> Result<FixedName, DecodeError> {
        let raw = self.read_array::<NAME_FIELD_LEN>(field)?;
        Ok(FixedName::from_field(&raw))
    }

    /// Read `count` little-endian u32 values
    pub fn read_u32s(&mut self, count: usize, field: &'static str) -> Result<Vec<u32>, DecodeError> {
        let block = self.read_block(count, 4, field)?;
        Ok(block.chunks_exact(4).map(LittleEndian::read_u32).collect())
    }

    /// Read `count` xyz positions
    pub fn read_points(&mut self, count: usize, field: &'static str) -> Result<Vec<Point3f>, DecodeError> {
        let block = self.read_block(count, 12, field)?;
        Ok(block
            .chunks_exact(12)
            .map(|c| {
                Point3f::new(
                    LittleEndian::read_f32(&c[0..4]),
                    LittleEndian::read_f32(&c[4..8]),
                    LittleEndian::read_f32(&c[8..12]),
                )
            })
            .collect())
    }

    /// Read `count` xyz vectors
    pub fn read_vectors(&mut self, count: usize, field: &'static str) -> Result<Vec<Vector3f>, DecodeError> {
        let block = self.read_block(count, 12, field)?;
        Ok(block
            .chunks_exact(12)
            .map(|c| {
                Vector3f::new(
                    LittleEndian::read_f32(&c[0..4]),
                    LittleEndian::read_f32(&c[4..8]),
                    LittleEndian::read_f32(&c[8..12]),
                )
            })
            .collect())
    }

    /// Read `count` uv pairs
    pub fn read_tex_coords(&mut self, count: usize, field: &'static str) -> Result<Vec<TexCoord>, DecodeError> {
        let block = self.read_block(count, 8, field)?;
        Ok(block
            .chunks_exact(8)
            .map(|c| [LittleEndian::read_f32(&c[0..4]), LittleEndian::read_f32(&c[4..8])])
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let data = [0x47, 0x01, 0x02, 0x04, 0x03, 0x02, 0x01, 0xff];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u8("a").unwrap(), 0x47);
        assert_eq!(reader.read_u16("b").unwrap(), 0x0201);
        assert_eq!(reader.read_u32("c").unwrap(), 0x01020304);
        assert_eq!(reader.position(), 7);
        assert_eq!(reader.rest(), &[0xff]);
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_truncated_reports_offset_and_field() {
        let data = [1, 2, 3, 4, 5, 6];
        let mut reader = ByteReader::new(&data);
        reader.read_u32("first").unwrap();
        let err = reader.read_u32("vertex count").unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                offset: 4,
                field: "vertex count",
                needed: 4,
                available: 2
            }
        );
        // a failed read does not move the cursor
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_huge_block_is_truncated_not_allocated() {
        let data = [0u8; 16];
        let mut reader = ByteReader::new(&data);
        let err = reader.read_points(usize::MAX / 4, "vertices").unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { field: "vertices", .. }));
    }

    #[test]
    fn test_read_points_and_tex_coords() {
        let mut data = Vec::new();
        for v in [1.0f32, 2.0, 3.0, 0.25, 0.75] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_points(1, "p").unwrap(), vec![Point3f::new(1.0, 2.0, 3.0)]);
        assert_eq!(reader.read_tex_coords(1, "t").unwrap(), vec![[0.25, 0.75]]);
    }
}
