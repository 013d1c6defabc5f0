use super::parser::validate_section;
use super::section::{self, PsiSection};
use super::types::*;
use crate::config::Config;
use crate::utils::crc::MPEG2;
use bytes::{BufMut, Bytes, BytesMut};
use log::{debug, error};

/// Builds TDT/TOT sections from [`Tot`] entities.
///
/// The table_id is derived from the entity: with descriptors it is a TOT
/// (0x73, descriptor loop and CRC_32), without it is an 8-byte TDT (0x70).
/// Generation never fails. A descriptor list too long for one section is cut
/// short and the error is logged.
#[derive(Debug, Clone, Default)]
pub struct TotGenerator {
    config: Config,
}

impl TotGenerator {
    /// Creates a generator with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Serializes `tot` into a complete section.
    ///
    /// For a TOT the computed CRC_32 is stored back into `tot.crc`.
    pub fn generate(&self, tot: &mut Tot) -> Bytes {
        let kind = tot.kind();
        let capacity = match kind {
            TableKind::Tdt => TDT_SECTION_SIZE,
            TableKind::Tot => MAX_PRIVATE_SECTION_SIZE,
        };
        let mut buf = BytesMut::with_capacity(capacity);

        buf.put_u8(kind.table_id());
        // section_syntax_indicator, private_indicator and section_length
        // are completed once the size is known
        buf.put_u16(0);
        buf.put_uint(tot.utc_time(), UTC_TIME_SIZE);

        if kind == TableKind::Tot {
            let loop_start = buf.len() + 2;
            // descriptors_loop_length placeholder
            buf.put_u16(0);

            let mut loop_length = 0usize;
            for descriptor in tot.descriptors() {
                // A TOT cannot span multiple sections
                if buf.len() + descriptor.length() as usize > MAX_TOT_CONTENT_SIZE {
                    error!(
                        target: "TDT/TOT generator",
                        "TOT does not fit into one section as it ought to be !!!"
                    );
                    break;
                }
                buf.put_u8(descriptor.tag());
                buf.put_u8(descriptor.length());
                buf.put_slice(descriptor.data());
                loop_length += descriptor.encoded_len();
            }

            let field = 0xF000 | (loop_length as u16 & 0x0FFF);
            buf[loop_start - 2..loop_start].copy_from_slice(&field.to_be_bytes());
        }

        let crc_len = if kind == TableKind::Tot { CRC_SIZE } else { 0 };
        let section_length = (buf.len() - SECTION_HEADER_SIZE + crc_len) as u16;
        if let Err(e) = section::write_header(&mut buf, false, false, section_length) {
            error!(target: "TDT/TOT generator", "failed to finalize section header: {}", e);
        }

        if kind == TableKind::Tot {
            let crc = MPEG2.calculate(&buf);
            buf.put_u32(crc);
            tot.crc = Some(crc);
        } else {
            tot.crc = None;
        }

        let bytes = buf.freeze();
        debug!(
            target: "TDT/TOT generator",
            "generated table_id 0x{:02x} ({} bytes, {} descriptors)",
            kind.table_id(),
            bytes.len(),
            tot.descriptors().len()
        );

        if self.config.self_check {
            self.self_check(&bytes);
        }
        bytes
    }

    fn self_check(&self, bytes: &Bytes) {
        let valid = PsiSection::parse(bytes.clone())
            .and_then(|section| validate_section(&section))
            .is_ok();
        if !valid {
            error!(target: "TDT/TOT generator", "********************************************");
            error!(target: "TDT/TOT generator", "*  Generated TDT/TOT section is invalid.   *");
            error!(target: "TDT/TOT generator", "*       THIS IS A BUG, PLEASE REPORT       *");
            error!(target: "TDT/TOT generator", "********************************************");
        }
    }
}

/// Serializes `tot` with the default configuration.
pub fn generate_section(tot: &mut Tot) -> Bytes {
    TotGenerator::default().generate(tot)
}
