/// CRC32 implementation specifically for MPEG-2 TS PSI/SI sections
/// Based on ITU-T H.222.0 / ISO/IEC 13818-1 Annex B
/// Polynomial: x32 + x26 + x23 + x22 + x16 + x12 + x11 + x10 + x8 + x7 + x5 + x4 + x2 + x + 1
/// Initial value: 0xFFFFFFFF, no reflection, no final XOR

const CRC32_MPEG2: u32 = 0x04C11DB7;

/// Shared calculator; the lookup table is built at compile time.
pub const MPEG2: Crc32Mpeg2 = Crc32Mpeg2::new();

/// MPEG-2 CRC32 calculator used for section validation and generation.
///
/// A section carrying its own CRC_32 field is valid when the CRC computed
/// over the whole section, CRC field included, is zero.
#[derive(Clone)]
pub struct Crc32Mpeg2 {
    /// Lookup table for fast CRC calculation
    table: [u32; 256],
}

impl Crc32Mpeg2 {
    /// Creates a new CRC32 calculator with pre-computed lookup table
    pub const fn new() -> Self {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = (i as u32) << 24;
            let mut bit = 0;
            while bit < 8 {
                crc = if (crc & 0x80000000) != 0 {
                    (crc << 1) ^ CRC32_MPEG2
                } else {
                    crc << 1
                };
                bit += 1;
            }
            table[i] = crc;
            i += 1;
        }
        Self { table }
    }

    /// Calculates the CRC32 checksum for the given data using the MPEG-2 algorithm
    ///
    /// # Examples
    ///
    /// ```
    /// use dvbsi::utils::Crc32Mpeg2;
    ///
    /// let crc = Crc32Mpeg2::new();
    /// assert_eq!(crc.calculate(b"123456789"), 0x0376E6E7);
    /// ```
    pub fn calculate(&self, data: &[u8]) -> u32 {
        let mut crc = 0xFFFFFFFF;
        for &byte in data {
            let index = ((crc >> 24) ^ (byte as u32)) & 0xFF;
            crc = (crc << 8) ^ self.table[index as usize];
        }
        crc
    }

    /// Returns true when `section` (trailing CRC_32 included) leaves a zero residue.
    pub fn validate(&self, section: &[u8]) -> bool {
        self.calculate(section) == 0
    }
}

impl Default for Crc32Mpeg2 {
    fn default() -> Self {
        Self::new()
    }
}
