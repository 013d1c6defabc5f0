use super::descriptor::Descriptor;
use crate::error::Result;

// Table IDs
/// Time and Date Table.
pub const TABLE_ID_TDT: u8 = 0x70;
/// Time Offset Table.
pub const TABLE_ID_TOT: u8 = 0x73;

// Constants
/// table_id plus the two indicator/length bytes.
pub const SECTION_HEADER_SIZE: usize = 3;
/// Trailing CRC_32.
pub const CRC_SIZE: usize = 4;
/// UTC_time field (16-bit MJD + 24-bit BCD).
pub const UTC_TIME_SIZE: usize = 5;
/// A TDT is always exactly this long.
pub const TDT_SECTION_SIZE: usize = SECTION_HEADER_SIZE + UTC_TIME_SIZE;
/// Required section_length of a TDT.
pub const TDT_PAYLOAD_SIZE: usize = UTC_TIME_SIZE;
/// Payload offset of the first TOT descriptor.
pub const TOT_DESCRIPTOR_LOOP_OFFSET: usize = UTC_TIME_SIZE + 2;
/// Largest private section, header included.
pub const MAX_PRIVATE_SECTION_SIZE: usize = 4096;
/// Limit checked before each descriptor is written into a TOT.
pub const MAX_TOT_CONTENT_SIZE: usize = 4090;
/// UTC_time is a 40-bit field.
pub const UTC_TIME_MASK: u64 = 0xFF_FFFF_FFFF;

/// Which of the two tables a section or entity stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Time and Date Table: UTC time only, no CRC.
    Tdt,
    /// Time Offset Table: UTC time, descriptor loop and CRC.
    Tot,
}

impl TableKind {
    /// Wire table_id for this kind.
    pub fn table_id(self) -> u8 {
        match self {
            TableKind::Tdt => TABLE_ID_TDT,
            TableKind::Tot => TABLE_ID_TOT,
        }
    }

    /// Maps a table_id back to its kind, if it belongs to the family.
    pub fn from_table_id(table_id: u8) -> Option<Self> {
        match table_id {
            TABLE_ID_TDT => Some(TableKind::Tdt),
            TABLE_ID_TOT => Some(TableKind::Tot),
            _ => None,
        }
    }
}

/// A decoded or to-be-generated TDT/TOT.
///
/// Whether this is a TDT or a TOT is never stored: an entity with at least
/// one descriptor is a TOT, an empty one is a TDT.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tot {
    utc_time: u64,
    descriptors: Vec<Descriptor>,
    /// CRC_32 written by the last generation, if it produced a TOT.
    pub crc: Option<u32>,
}

impl Tot {
    /// Creates an entity with no descriptors. Only the low 40 bits of
    /// `utc_time` are kept.
    pub fn new(utc_time: u64) -> Self {
        Self {
            utc_time: utc_time & UTC_TIME_MASK,
            descriptors: Vec::new(),
            crc: None,
        }
    }

    /// Raw 40-bit UTC_time (MJD + BCD, not interpreted).
    pub fn utc_time(&self) -> u64 {
        self.utc_time
    }

    pub(crate) fn set_utc_time(&mut self, utc_time: u64) {
        self.utc_time = utc_time & UTC_TIME_MASK;
    }

    /// Descriptors in wire order.
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Derived table kind.
    pub fn kind(&self) -> TableKind {
        if self.descriptors.is_empty() {
            TableKind::Tdt
        } else {
            TableKind::Tot
        }
    }

    /// Derived table_id.
    pub fn table_id(&self) -> u8 {
        self.kind().table_id()
    }

    /// Returns true if this entity would be generated as a TDT.
    pub fn is_tdt(&self) -> bool {
        self.kind() == TableKind::Tdt
    }

    /// Appends a descriptor built from `tag` and the first `length` bytes of
    /// `data`. On failure nothing is appended.
    pub fn add_descriptor(&mut self, tag: u8, length: u8, data: &[u8]) -> Result<&Descriptor> {
        let descriptor = Descriptor::new(tag, length, data)?;
        self.push_descriptor(descriptor)
    }

    pub(crate) fn push_descriptor(&mut self, descriptor: Descriptor) -> Result<&Descriptor> {
        self.descriptors.try_reserve(1)?;
        self.descriptors.push(descriptor);
        let index = self.descriptors.len() - 1;
        Ok(&self.descriptors[index])
    }

    /// Drops every descriptor, turning the entity back into a TDT.
    pub fn clear_descriptors(&mut self) {
        self.descriptors.clear();
    }
}
