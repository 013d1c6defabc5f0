use std::collections::TryReserveError;
use thiserror::Error;

/// Errors raised while registering decoders, decoding or building sections.
#[derive(Error, Debug)]
pub enum SiError {
    /// A decoder is already registered for this subtable.
    #[error("already a decoder for (table_id == 0x{table_id:02x}, extension == 0x{extension:02x})")]
    AlreadyRegistered {
        /// Table identifier of the occupied slot.
        table_id: u8,
        /// Table extension of the occupied slot.
        extension: u16,
    },

    /// No decoder is registered for this subtable.
    #[error("no such decoder (table_id == 0x{table_id:02x}, extension == 0x{extension:02x})")]
    NotFound {
        /// Table identifier that was looked up.
        table_id: u8,
        /// Table extension that was looked up.
        extension: u16,
    },

    /// The table identifier does not belong to the TDT/TOT family.
    #[error("invalid table_id 0x{0:02x}")]
    InvalidTableId(u8),

    /// The section_syntax_indicator bit is set on a short-form section.
    #[error("invalid section (section_syntax_indicator != 0)")]
    SyntaxIndicator,

    /// A TDT must carry exactly 5 payload bytes.
    #[error("TDT has an invalid payload size ({0} bytes)")]
    InvalidTdtLength(usize),

    /// CRC residue over the whole section was not zero.
    #[error("bad CRC_32 (0x{0:08x})")]
    BadCrc(u32),

    /// A read went past the end of the available data.
    #[error("truncated data: needed {needed} bytes, {available} available")]
    Truncated {
        /// Bytes required by the read.
        needed: usize,
        /// Bytes actually remaining.
        available: usize,
    },

    /// Descriptor data shorter than its declared length.
    #[error("descriptor declares {declared} bytes but only {available} were supplied")]
    DescriptorLength {
        /// Declared descriptor_length.
        declared: u8,
        /// Length of the supplied data.
        available: usize,
    },

    /// Growing a table's storage failed.
    #[error("allocation failure: {0}")]
    Allocation(#[from] TryReserveError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SiError>;
