//! Bank checksum relative to a factory baseline.
//!
//! The device stores the baseline bank's checksum plus the summed byte
//! differences between a bank and that baseline over `[16, 0x9B4CF)`, all
//! modulo 65536. The differences telescope, so the checksum of any bank is
//! its own byte sum plus a constant offset fixed by the baseline.

use tracing::warn;

use crate::bytes::read_u16_be;
use crate::layout::{BANK_VERSION, CHECKSUM_OFFSET, CHECKSUM_START, VERSION_OFFSET};
use crate::{validate, FormatError};

/// Sum of the checksummed bytes, modulo 65536.
pub fn byte_sum(data: &[u8]) -> u16 {
    data.get(CHECKSUM_START..CHECKSUM_OFFSET)
        .unwrap_or(&[])
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(b as u16))
}

/// The versioned constant a checksum is computed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Baseline {
    offset: u16,
    version: u8,
}

impl Default for Baseline {
    /// Baseline of the generated default image, whose stored checksum is its
    /// plain byte sum.
    fn default() -> Self {
        Self { offset: 0, version: BANK_VERSION }
    }
}

impl Baseline {
    pub const fn new(offset: u16, version: u8) -> Self {
        Self { offset, version }
    }

    /// Derive the baseline from a factory template bank.
    pub fn from_template(template: &[u8]) -> Result<Self, FormatError> {
        Self::from_bank(template)
    }

    /// Baseline under which `data`'s stored checksum is already correct.
    ///
    /// Any bank whose checksum the device wrote shares the factory offset,
    /// so edits checked against this baseline move the checksum by exactly
    /// the changed byte values.
    pub fn from_bank(data: &[u8]) -> Result<Self, FormatError> {
        validate(data)?;
        let stored = read_u16_be(data, CHECKSUM_OFFSET)?;
        Ok(Self {
            offset: stored.wrapping_sub(byte_sum(data)),
            version: data[VERSION_OFFSET],
        })
    }

    pub const fn offset(&self) -> u16 {
        self.offset
    }

    pub const fn version(&self) -> u8 {
        self.version
    }

    /// Checksum of a bank buffer.
    pub fn checksum(&self, data: &[u8]) -> u16 {
        byte_sum(data).wrapping_add(self.offset)
    }

    /// Warn when the bank's format version differs from the template's.
    pub(crate) fn check_version(&self, version: u8) {
        if version != self.version {
            warn!(bank = version, baseline = self.version, "checksum baseline is from another format version");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::default_bank;

    #[test]
    fn default_baseline_is_plain_sum() {
        let buf = default_bank();
        let stored = read_u16_be(&buf, CHECKSUM_OFFSET).unwrap();
        assert_eq!(Baseline::default().checksum(&buf), stored);
        assert_eq!(Baseline::from_template(&buf), Ok(Baseline::default()));
    }

    #[test]
    fn template_offset_matches_difference_sum() {
        let mut template = default_bank();
        template[CHECKSUM_OFFSET..].copy_from_slice(&0x1234u16.to_be_bytes());
        let baseline = Baseline::from_template(&template).unwrap();

        let mut bank = template.clone();
        bank[100] = bank[100].wrapping_add(3);
        bank[200] = bank[200].wrapping_sub(1);
        assert_eq!(baseline.checksum(&bank), 0x1234 + 2);
        assert_eq!(baseline.checksum(&template), 0x1234);
    }

    #[test]
    fn bank_baseline_keeps_stored_checksum() {
        let mut bank = default_bank();
        let stored = byte_sum(&bank).wrapping_add(0x1234);
        bank[CHECKSUM_OFFSET..].copy_from_slice(&stored.to_be_bytes());
        let baseline = Baseline::from_bank(&bank).unwrap();
        assert_eq!(baseline.offset(), 0x1234);
        assert_eq!(baseline.checksum(&bank), stored);
        assert!(Baseline::from_bank(&bank[..100]).is_err());
    }

    #[test]
    fn header_bytes_are_not_summed() {
        let mut buf = default_bank();
        let before = byte_sum(&buf);
        buf[3] = 0xFF;
        buf[CHECKSUM_OFFSET] = 0xFF;
        assert_eq!(byte_sum(&buf), before);
    }
}
