//! # Utility Functions and Types
//!
//! Byte-level helpers shared by the section decoder and generator:
//!
//! - Bounds-checked big-endian reading
//! - CRC calculation and validation
//!
//! ## Checked reads
//!
//! ```rust
//! use dvbsi::utils::ByteReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = [0xF0, 0x0D];
//! let mut reader = ByteReader::new(&data);
//! assert_eq!(reader.read_u16()? & 0x0FFF, 13);
//! assert!(reader.read_u8().is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## CRC Calculation
//!
//! ```rust
//! use dvbsi::utils::crc::MPEG2;
//!
//! let mut section = vec![0x73, 0x30, 0x0b];
//! let crc = MPEG2.calculate(&section);
//! section.extend_from_slice(&crc.to_be_bytes());
//! assert!(MPEG2.validate(&section));
//! ```

/// CRC calculation implementations
pub mod crc;

/// Bounds-checked byte reading
pub mod reader;

pub use crc::Crc32Mpeg2;
pub use reader::ByteReader;
