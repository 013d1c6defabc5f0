use super::section::PsiSection;
use super::types::*;
use crate::error::{Result, SiError};
use crate::utils::crc::MPEG2;
use crate::utils::ByteReader;
use log::{error, trace};

/// Rejects sections that cannot be a TDT or TOT at all: a foreign table_id
/// or a set section_syntax_indicator.
pub(crate) fn check_header(section: &PsiSection) -> Result<()> {
    if TableKind::from_table_id(section.table_id).is_none() {
        return Err(SiError::InvalidTableId(section.table_id));
    }
    if section.syntax_indicator {
        return Err(SiError::SyntaxIndicator);
    }
    Ok(())
}

/// Checks a TDT/TOT section before decoding.
///
/// The table_id must be 0x70 or 0x73 and the syntax indicator clear. A TOT
/// must then leave a zero CRC residue over the whole section, and a TDT must
/// carry exactly five payload bytes.
pub fn validate_section(section: &PsiSection) -> Result<()> {
    check_header(section)?;

    if section.table_id == TABLE_ID_TOT {
        let residue = MPEG2.calculate(section.data());
        if residue != 0 {
            error!(target: "TDT/TOT decoder", "Bad CRC_32 (0x{:08x}) !!!", residue);
            return Err(SiError::BadCrc(residue));
        }
        return Ok(());
    }

    let length = section.length as usize;
    if length != TDT_PAYLOAD_SIZE {
        error!(
            target: "TDT/TOT decoder",
            "TDT has an invalid payload size ({} bytes) !!!",
            length
        );
        return Err(SiError::InvalidTdtLength(length));
    }
    Ok(())
}

/// Reads the 40-bit UTC_time at the start of the payload, if present.
pub fn read_utc_time(section: &PsiSection) -> Option<u64> {
    ByteReader::new(section.payload()).read_u40().ok()
}

/// Validates `section` and decodes it into a fresh entity.
pub fn decode_section(section: &PsiSection) -> Result<Tot> {
    let mut tot = Tot::new(0);
    decode_into(&mut tot, section)?;
    Ok(tot)
}

/// Validates `section` and decodes it into `tot`.
///
/// For a TOT, descriptors are appended while a tag/length pair still fits
/// inside the descriptor loop. A descriptor whose declared length runs past
/// the end of the payload is not added, but the cursor still moves past it
/// by the declared length.
pub fn decode_into(tot: &mut Tot, section: &PsiSection) -> Result<()> {
    validate_section(section)?;

    let payload = section.payload();
    let mut reader = ByteReader::new(payload);

    if payload.len() >= UTC_TIME_SIZE {
        tot.set_utc_time(reader.read_u40()?);
    }

    if section.table_id != TABLE_ID_TOT {
        return Ok(());
    }

    reader.seek(UTC_TIME_SIZE);
    let loop_length = (reader.read_u16()? & 0x0FFF) as usize;
    let loop_end = TOT_DESCRIPTOR_LOOP_OFFSET + loop_length;

    while reader.position() + 2 <= loop_end {
        let pos = reader.position();
        let (tag, length) = match (reader.read_u8(), reader.read_u8()) {
            (Ok(tag), Ok(length)) => (tag, length),
            _ => break,
        };

        if length as usize + 2 <= payload.len() - pos {
            let data = reader.read_bytes(length as usize)?;
            tot.add_descriptor(tag, length, data)?;
        } else {
            trace!(
                target: "TDT/TOT decoder",
                "skipping descriptor 0x{:02x} ({} bytes) past end of payload",
                tag,
                length
            );
        }
        reader.seek(pos + 2 + length as usize);
    }

    Ok(())
}
