#![doc(html_root_url = "https://docs.rs/dvbsi/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # dvbsi - DVB Service Information sections
//!
//! `dvbsi` decodes and generates MPEG-TS/DVB private sections, starting with
//! the Time and Date Table (TDT) and the Time Offset Table (TOT). Sections are
//! expected already reassembled from transport packets; the crate validates
//! them, decodes them into owned tables and hands those to whoever attached a
//! decoder for the table_id.
//!
//! ## Features
//!
//! - CRC_32 (MPEG-2) validation of untrusted section data
//! - Bounds-checked decoding of every field and descriptor loop
//! - Byte-exact generation of TDT/TOT sections, reserved bits included
//! - A table_id keyed decoder registry with closure, channel and collector
//!   delivery
//!
//! ## Quick Start
//!
//! ```rust
//! use dvbsi::psi::{attach_tot, decode_section, generate_section, Demux, PsiSection, Tot};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Build a TOT carrying one local_time_offset_descriptor
//! let mut tot = Tot::new(0xC079_1234_56);
//! tot.add_descriptor(0x58, 3, b"DEU")?;
//! let bytes = generate_section(&mut tot);
//!
//! // Decode it straight back
//! let section = PsiSection::parse(bytes.clone())?;
//! let decoded = decode_section(&section)?;
//! assert_eq!(decoded.utc_time(), tot.utc_time());
//! assert_eq!(decoded.descriptors(), tot.descriptors());
//!
//! // Or route it through a demultiplexer
//! let mut demux = Demux::new();
//! attach_tot(&mut demux, 0x73, 0, |tot: Tot| {
//!     println!("UTC_time: {:010x}", tot.utc_time());
//! })?;
//! demux.push_bytes(bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - `psi`: sections, the TDT/TOT entity, decoder, generator and registry
//! - `error`: error type and `Result` alias
//! - `utils`: CRC-32/MPEG-2 and a bounds-checked byte reader
//! - `config`: runtime switches, loadable from the environment

/// Runtime configuration
pub mod config;

/// Error types and utilities
pub mod error;

/// PSI/SI sections and the TDT/TOT tables
pub mod psi;

/// Common utilities and helper functions
pub mod utils;

pub use config::Config;
pub use error::{Result, SiError};
