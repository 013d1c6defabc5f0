use crate::error::{Result, SiError};

/// A generic tag/length/data descriptor as carried in DVB descriptor loops.
///
/// The `length` field always equals `data.len()`; both are fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Descriptor {
    tag: u8,
    length: u8,
    data: Vec<u8>,
}

impl Descriptor {
    /// Creates a descriptor from its tag and the first `length` bytes of `data`.
    ///
    /// Fails when `data` is shorter than `length`, or when the payload
    /// storage cannot be allocated.
    pub fn new(tag: u8, length: u8, data: &[u8]) -> Result<Self> {
        let payload = data.get(..length as usize).ok_or(SiError::DescriptorLength {
            declared: length,
            available: data.len(),
        })?;

        let mut owned = Vec::new();
        owned.try_reserve_exact(payload.len())?;
        owned.extend_from_slice(payload);

        Ok(Self {
            tag,
            length,
            data: owned,
        })
    }

    /// Descriptor tag.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Declared descriptor_length.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// Descriptor payload, exactly `length` bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size on the wire: tag, length and payload.
    pub fn encoded_len(&self) -> usize {
        2 + self.data.len()
    }
}
