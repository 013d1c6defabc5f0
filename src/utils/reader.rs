use crate::error::{Result, SiError};

/// A bounds-checked big-endian reader over a byte slice.
///
/// Every read checks the remaining length first and fails with
/// [`SiError::Truncated`] instead of indexing past the end, so length fields
/// taken from broadcast input can never drive a read out of bounds.
///
/// Example:
/// ```
/// use dvbsi::utils::ByteReader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0xF0, 0x0D];
/// let mut reader = ByteReader::new(&data);
///
/// assert_eq!(reader.read_u40().unwrap(), 0x0102030405);
/// assert_eq!(reader.read_u16().unwrap() & 0x0FFF, 0x000D);
/// assert!(reader.read_u8().is_err());
/// ```
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new ByteReader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, offset: 0 }
    }

    /// Current position from the start of the data.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Total length of the underlying data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the underlying data is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Moves to an absolute position. Seeking past the end is allowed;
    /// subsequent reads will fail.
    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Returns the next `n` bytes and advances past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(SiError::Truncated {
                needed: n,
                available,
            });
        }
        let start = self.offset.min(self.data.len());
        let bytes = &self.data[start..start + n];
        self.offset = start + n;
        Ok(bytes)
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a big-endian 16-bit value.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a big-endian 40-bit value into the low bits of a u64.
    pub fn read_u40(&mut self) -> Result<u64> {
        let bytes = self.read_bytes(5)?;
        Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }
}
