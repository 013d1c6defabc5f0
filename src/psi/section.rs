//! Reassembled PSI/SI sections and header finalization.

use super::types::SECTION_HEADER_SIZE;
use crate::error::{Result, SiError};
use bytes::Bytes;

/// A complete section as delivered by the section reassembler.
///
/// `data` starts at `table_id` and ends exactly `3 + length` bytes later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsiSection {
    /// Table identifier (byte 0).
    pub table_id: u8,
    /// section_syntax_indicator.
    pub syntax_indicator: bool,
    /// private_indicator.
    pub private_indicator: bool,
    /// 12-bit section_length: number of bytes following byte 2.
    pub length: u16,
    /// table_id_extension for long sections, 0 for short ones.
    pub extension: u16,
    data: Bytes,
}

impl PsiSection {
    /// Reads the three header bytes of a complete section and keeps exactly
    /// `3 + section_length` bytes of it.
    pub fn parse(data: impl Into<Bytes>) -> Result<Self> {
        let mut data: Bytes = data.into();
        if data.len() < SECTION_HEADER_SIZE {
            return Err(SiError::Truncated {
                needed: SECTION_HEADER_SIZE,
                available: data.len(),
            });
        }

        let table_id = data[0];
        let syntax_indicator = data[1] & 0x80 != 0;
        let private_indicator = data[1] & 0x40 != 0;
        let length = ((data[1] as u16 & 0x0F) << 8) | data[2] as u16;

        let total = SECTION_HEADER_SIZE + length as usize;
        if data.len() < total {
            return Err(SiError::Truncated {
                needed: total,
                available: data.len(),
            });
        }
        data.truncate(total);

        let extension = if syntax_indicator && data.len() >= 5 {
            ((data[3] as u16) << 8) | data[4] as u16
        } else {
            0
        };

        Ok(Self {
            table_id,
            syntax_indicator,
            private_indicator,
            length,
            extension,
            data,
        })
    }

    /// Whole section, header included.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes after the 3-byte header. For a TOT this includes the CRC_32.
    pub fn payload(&self) -> &[u8] {
        &self.data[SECTION_HEADER_SIZE..]
    }
}

/// Completes bytes 1-2 of a section: both indicators, the reserved `11`
/// bits and the 12-bit section_length.
pub fn write_header(
    section: &mut [u8],
    syntax_indicator: bool,
    private_indicator: bool,
    length: u16,
) -> Result<()> {
    if section.len() < SECTION_HEADER_SIZE {
        return Err(SiError::Truncated {
            needed: SECTION_HEADER_SIZE,
            available: section.len(),
        });
    }

    let mut b1 = 0x30 | ((length >> 8) & 0x0F) as u8;
    if syntax_indicator {
        b1 |= 0x80;
    }
    if private_indicator {
        b1 |= 0x40;
    }
    section[1] = b1;
    section[2] = (length & 0xFF) as u8;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_short_section() {
        let section = PsiSection::parse(vec![0x70, 0x70, 0x05, 0xC0, 0x79, 0x12, 0x34, 0x56]).unwrap();
        assert_eq!(section.table_id, 0x70);
        assert!(!section.syntax_indicator);
        assert!(section.private_indicator);
        assert_eq!(section.length, 5);
        assert_eq!(section.extension, 0);
        assert_eq!(section.payload(), &[0xC0, 0x79, 0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_parse_trims_trailing_stuffing() {
        let section = PsiSection::parse(vec![0x70, 0x30, 0x05, 0, 0, 0, 0, 0, 0xFF, 0xFF]).unwrap();
        assert_eq!(section.data().len(), 8);
    }

    #[test]
    fn test_parse_long_section_extension() {
        let section = PsiSection::parse(vec![0x73, 0xB0, 0x05, 0x12, 0x34, 0, 0, 0]).unwrap();
        assert!(section.syntax_indicator);
        assert_eq!(section.extension, 0x1234);
    }

    #[test]
    fn test_parse_truncated() {
        assert!(PsiSection::parse(vec![0x70, 0x30]).is_err());
        assert!(PsiSection::parse(vec![0x70, 0x30, 0x05, 0, 0]).is_err());
    }

    #[test]
    fn test_write_header() {
        let mut buf = [0x73, 0, 0];
        write_header(&mut buf, false, false, 0x123).unwrap();
        assert_eq!(buf, [0x73, 0x31, 0x23]);

        write_header(&mut buf, true, true, 5).unwrap();
        assert_eq!(buf, [0x73, 0xF0, 0x05]);

        assert!(write_header(&mut [0u8; 2], false, false, 5).is_err());
    }
}
