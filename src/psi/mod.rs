//! # DVB SI: Time and Date Table / Time Offset Table
//!
//! This module implements the TDT (table_id 0x70) and TOT (table_id 0x73)
//! sections of ETSI EN 300 468, together with the subtable decoder registry
//! that routes reassembled sections to them:
//!
//! - Section validation (CRC_32 for TOT, fixed 5-byte payload for TDT)
//! - Bounds-checked decoding of the UTC time and the TOT descriptor loop
//! - Byte-exact section generation, including reserved bits and CRC_32
//! - Decoder attach/detach keyed by table_id, with delivery to closures,
//!   channels or a shared collector
//!
//! ## Example Usage
//!
//! ### Decoding through a demultiplexer
//!
//! ```rust
//! use dvbsi::psi::{attach_tot, Demux, TotCollector, TABLE_ID_TDT};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut demux = Demux::new();
//! let collector = TotCollector::new();
//! attach_tot(&mut demux, TABLE_ID_TDT, 0, collector.clone())?;
//!
//! demux.push_bytes(vec![0x70, 0x30, 0x05, 0xC0, 0x79, 0x12, 0x34, 0x56])?;
//!
//! let tables = collector.take();
//! assert_eq!(tables.len(), 1);
//! assert_eq!(tables[0].utc_time(), 0xC0_7912_3456);
//! # Ok(())
//! # }
//! ```
//!
//! ### Generating a TOT
//!
//! ```rust
//! use dvbsi::psi::{generate_section, Tot, TABLE_ID_TOT};
//! use dvbsi::utils::crc::MPEG2;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tot = Tot::new(0xC079_1234_56);
//! tot.add_descriptor(0x58, 2, &[0x00, 0x01])?;
//!
//! let section = generate_section(&mut tot);
//! assert_eq!(section[0], TABLE_ID_TOT);
//! assert!(MPEG2.validate(&section));
//! # Ok(())
//! # }
//! ```

/// Subtable decoder registry and the TDT/TOT decoder
pub mod demux;

/// Tag/length/data descriptors
pub mod descriptor;

/// TDT/TOT section generation
pub mod generator;

/// Delivery of decoded tables
pub mod handler;

/// TDT/TOT section validation and decoding
pub mod parser;

/// Complete sections and header finalization
pub mod section;

/// Table entity, table kinds and constants
pub mod types;


// Re-export commonly used types and constants
pub use demux::{attach_tot, attach_tot_channel, detach_tot, Demux, SubtableDecoder, SubtableId, TotDecoder};
pub use descriptor::Descriptor;
pub use generator::{generate_section, TotGenerator};
pub use handler::{ChannelHandler, TotCollector, TotHandler};
pub use parser::{decode_section, validate_section};
pub use section::PsiSection;
pub use types::{TableKind, Tot, TABLE_ID_TDT, TABLE_ID_TOT};
