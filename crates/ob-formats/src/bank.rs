//! Bank files: sixteen patterns, eight part slots, part names and checksum.

use arrayvec::ArrayString;
use binrw::io::Cursor;
use binrw::BinRead;
use ob_ir::RangeError;
use tracing::{debug, warn};

use crate::checksum::Baseline;
use crate::layout::*;
use crate::part::Part;
use crate::pattern::Pattern;
use crate::template;
use crate::{BankError, ConsistencyError, FormatError};

/// Fixed header and format version at the start of a bank file.
#[derive(BinRead, Clone, Copy, Debug, PartialEq, Eq)]
#[br(big, magic = b"FORM\0\0\0\0DPS1BANK\0\0\0\0\0")]
pub struct BankHeader {
    pub version: u8,
}

impl BankHeader {
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        BankHeader::read(&mut Cursor::new(data)).map_err(|e| {
            if e.is_eof() {
                FormatError::WrongLength { expected: BANK_SIZE, found: data.len() }
            } else {
                FormatError::InvalidHeader
            }
        })
    }
}

/// Check header, version and length without opening a bank.
pub fn validate(data: &[u8]) -> Result<(), FormatError> {
    let header = BankHeader::parse(data)?;
    if header.version != BANK_VERSION {
        return Err(FormatError::UnsupportedVersion { found: header.version, expected: BANK_VERSION });
    }
    if data.len() != BANK_SIZE {
        return Err(FormatError::WrongLength { expected: BANK_SIZE, found: data.len() });
    }
    Ok(())
}

/// What to do when a loaded bank's stored checksum is stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChecksumPolicy {
    /// Accept silently
    Ignore,
    /// Accept and log a warning
    #[default]
    Warn,
    /// Reject with [`ConsistencyError::ChecksumMismatch`]
    Strict,
}

/// Settings used when opening a bank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BankOptions {
    /// Baseline to check and write checksums against. `None` derives it from
    /// the bank's own stored checksum, which then always verifies.
    pub baseline: Option<Baseline>,
    pub checksum: ChecksumPolicy,
}

/// Which copy of a part to address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PartState {
    /// Working copy, edited live
    #[default]
    Unsaved,
    /// Copy restored by a part reload
    Saved,
}

/// A validated bank buffer.
#[derive(Clone, Debug)]
pub struct Bank<B = Vec<u8>> {
    data: B,
    options: BankOptions,
    baseline: Baseline,
}

fn pattern_range(pattern: usize) -> Result<core::ops::Range<usize>, RangeError> {
    let index = RangeError::check("pattern", pattern, 1, PATTERN_COUNT)? - 1;
    let start = PATTERNS_OFFSET + index * PATTERN_SIZE;
    Ok(start..start + PATTERN_SIZE)
}

fn part_range(part: usize, state: PartState) -> Result<core::ops::Range<usize>, RangeError> {
    let index = RangeError::check("part", part, 1, PART_COUNT)? - 1;
    let slot = match state {
        PartState::Unsaved => index,
        PartState::Saved => PART_COUNT + index,
    };
    let start = PARTS_OFFSET + slot * PART_SIZE;
    Ok(start..start + PART_SIZE)
}

fn name_range(part: usize) -> Result<core::ops::Range<usize>, RangeError> {
    let index = RangeError::check("part", part, 1, PART_COUNT)? - 1;
    let start = PART_NAMES_OFFSET + index * PART_NAME_LEN;
    Ok(start..start + PART_NAME_LEN)
}

impl Bank<Vec<u8>> {
    /// A default bank with a valid checksum.
    pub fn new() -> Self {
        let baseline = Baseline::default();
        Self {
            data: template::default_bank(),
            options: BankOptions { baseline: Some(baseline), ..BankOptions::default() },
            baseline,
        }
    }
}

impl Default for Bank<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AsRef<[u8]>> Bank<B> {
    /// Validate `data` and apply the checksum policy.
    pub fn open(data: B, options: &BankOptions) -> Result<Self, BankError> {
        validate(data.as_ref())?;
        let baseline = match options.baseline {
            Some(baseline) => baseline,
            None => Baseline::from_bank(data.as_ref())?,
        };
        let bank = Self { data, options: *options, baseline };
        let version = bank.version();
        let stored = bank.stored_checksum();
        debug!(version, stored, offset = baseline.offset(), "opened bank");
        baseline.check_version(version);

        match options.checksum {
            ChecksumPolicy::Ignore => {}
            ChecksumPolicy::Warn => {
                if let Err(ConsistencyError::ChecksumMismatch { stored, computed }) = bank.verify_checksum() {
                    warn!(stored, computed, "bank checksum mismatch");
                }
            }
            ChecksumPolicy::Strict => bank.verify_checksum()?,
        }
        Ok(bank)
    }

    /// Open with default options.
    pub fn from_buffer(data: B) -> Result<Self, BankError> {
        Self::open(data, &BankOptions::default())
    }

    pub fn options(&self) -> &BankOptions {
        &self.options
    }

    /// Baseline in effect, either the configured one or the one derived on
    /// open.
    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.data
    }

    pub fn version(&self) -> u8 {
        self.as_bytes()[VERSION_OFFSET]
    }

    /// Pattern 1-16.
    pub fn pattern(&self, pattern: usize) -> Result<Pattern<&[u8]>, RangeError> {
        let range = pattern_range(pattern)?;
        Ok(Pattern::wrap(&self.as_bytes()[range]))
    }

    pub fn patterns(&self) -> impl Iterator<Item = Pattern<&[u8]>> + '_ {
        let end = PATTERNS_OFFSET + PATTERN_COUNT * PATTERN_SIZE;
        self.as_bytes()[PATTERNS_OFFSET..end].chunks_exact(PATTERN_SIZE).map(Pattern::wrap)
    }

    /// Part 1-4 in the given state.
    pub fn part(&self, part: usize, state: PartState) -> Result<Part<&[u8]>, RangeError> {
        let range = part_range(part, state)?;
        Ok(Part::wrap(&self.as_bytes()[range]))
    }

    /// Number of flex sample slots in use, as cached in the file.
    pub fn flex_slot_count(&self) -> u8 {
        self.as_bytes()[FLEX_COUNTER_OFFSET]
    }

    /// Name of part 1-4, without padding.
    /// Non-ASCII bytes read as `?`.
    pub fn part_name(&self, part: usize) -> Result<ArrayString<PART_NAME_LEN>, RangeError> {
        let mut name = ArrayString::new();
        for &b in self.as_bytes()[name_range(part)?].iter().take_while(|&&b| b != 0) {
            name.push(if b.is_ascii() { b as char } else { '?' });
        }
        Ok(name)
    }

    pub fn stored_checksum(&self) -> u16 {
        let data = self.as_bytes();
        u16::from_be_bytes([data[CHECKSUM_OFFSET], data[CHECKSUM_OFFSET + 1]])
    }

    /// Checksum of the current contents against the baseline.
    pub fn compute_checksum(&self) -> u16 {
        self.baseline.checksum(self.as_bytes())
    }

    pub fn verify_checksum(&self) -> Result<(), ConsistencyError> {
        let stored = self.stored_checksum();
        let computed = self.compute_checksum();
        if stored != computed {
            return Err(ConsistencyError::ChecksumMismatch { stored, computed });
        }
        Ok(())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Bank<B> {
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.data.as_mut()
    }

    pub fn pattern_mut(&mut self, pattern: usize) -> Result<Pattern<&mut [u8]>, RangeError> {
        let range = pattern_range(pattern)?;
        Ok(Pattern::wrap(&mut self.bytes_mut()[range]))
    }

    pub fn part_mut(&mut self, part: usize, state: PartState) -> Result<Part<&mut [u8]>, RangeError> {
        let range = part_range(part, state)?;
        Ok(Part::wrap(&mut self.bytes_mut()[range]))
    }

    pub fn set_flex_slot_count(&mut self, count: u8) {
        self.bytes_mut()[FLEX_COUNTER_OFFSET] = count;
    }

    /// Rename part 1-4. Names are ASCII and at most seven characters.
    pub fn set_part_name(&mut self, part: usize, name: &str) -> Result<(), RangeError> {
        let range = name_range(part)?;
        RangeError::check("part name length", name.len(), 0, PART_NAME_LEN)?;
        if let Some(c) = name.chars().find(|c| !c.is_ascii()) {
            return Err(RangeError::new("part name character", c as i64, 0, 127));
        }
        let slot = &mut self.bytes_mut()[range];
        slot.fill(0);
        slot[..name.len()].copy_from_slice(name.as_bytes());
        Ok(())
    }

    /// Copy pattern `from` over pattern `to`.
    pub fn copy_pattern(&mut self, from: usize, to: usize) -> Result<(), RangeError> {
        let src = pattern_range(from)?;
        let dst = pattern_range(to)?;
        self.bytes_mut().copy_within(src, dst.start);
        Ok(())
    }

    /// Copy part `from` over part `to` within one state. The destination
    /// keeps its part id.
    pub fn copy_part(&mut self, from: usize, to: usize, state: PartState) -> Result<(), RangeError> {
        let src = part_range(from, state)?;
        let dst = part_range(to, state)?;
        let id = self.as_bytes()[dst.start + PART_ID];
        self.bytes_mut().copy_within(src, dst.start);
        self.bytes_mut()[dst.start + PART_ID] = id;
        Ok(())
    }

    /// Recompute and store the checksum.
    pub fn update_checksum(&mut self) -> u16 {
        let checksum = self.compute_checksum();
        debug!(old = self.stored_checksum(), new = checksum, "updating bank checksum");
        self.bytes_mut()[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&checksum.to_be_bytes());
        checksum
    }

    /// Bytes ready to write to disk, with a fresh checksum.
    pub fn serialize(&mut self) -> &[u8] {
        self.update_checksum();
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_parses() {
        let bank = Bank::new();
        assert_eq!(BankHeader::parse(bank.as_bytes()), Ok(BankHeader { version: BANK_VERSION }));
        assert_eq!(BankHeader::parse(b"FORM"), Err(FormatError::WrongLength { expected: BANK_SIZE, found: 4 }));
        assert_eq!(BankHeader::parse(&[0u8; 64]), Err(FormatError::InvalidHeader));
    }

    #[test]
    fn validate_reports_reason() {
        let mut data = Bank::new().into_inner();
        assert_eq!(validate(&data), Ok(()));
        data[VERSION_OFFSET] = 22;
        assert_eq!(
            validate(&data),
            Err(FormatError::UnsupportedVersion { found: 22, expected: BANK_VERSION })
        );
        data[VERSION_OFFSET] = BANK_VERSION;
        data.push(0);
        assert_eq!(validate(&data), Err(FormatError::WrongLength { expected: BANK_SIZE, found: BANK_SIZE + 1 }));
        data[4] = 1;
        assert_eq!(validate(&data), Err(FormatError::InvalidHeader));
    }

    #[test]
    fn default_bank_contents() {
        let bank = Bank::new();
        assert_eq!(bank.verify_checksum(), Ok(()));
        assert_eq!(bank.flex_slot_count(), 0);
        assert_eq!(bank.part_name(3).as_deref(), Ok("THREE"));
        assert_eq!(bank.patterns().count(), 16);
        assert_eq!(bank.part(4, PartState::Saved).unwrap().part_id(), 3);
        assert!(bank.pattern(17).is_err());
        assert!(bank.part(0, PartState::Unsaved).is_err());
    }

    #[test]
    fn part_states_are_separate() {
        let mut bank = Bank::new();
        bank.part_mut(2, PartState::Saved).unwrap().set_active_scene_a(5).unwrap();
        assert_eq!(bank.part(2, PartState::Saved).unwrap().active_scene_a(), 5);
        assert_eq!(bank.part(2, PartState::Unsaved).unwrap().active_scene_a(), 0);
    }

    #[test]
    fn part_names() {
        let mut bank = Bank::new();
        bank.set_part_name(1, "KICKS").unwrap();
        assert_eq!(bank.part_name(1).as_deref(), Ok("KICKS"));
        assert!(bank.set_part_name(1, "TOOLONGX").is_err());
        assert!(bank.set_part_name(2, "é").is_err());
        assert_eq!(bank.part_name(2).as_deref(), Ok("TWO"));
        bank.set_part_name(4, "").unwrap();
        assert_eq!(bank.part_name(4).as_deref(), Ok(""));
    }

    #[test]
    fn checksum_policies() {
        let mut data = Bank::new().into_inner();
        data[CHECKSUM_OFFSET] ^= 0xFF;

        let strict = BankOptions { baseline: Some(Baseline::default()), checksum: ChecksumPolicy::Strict };
        assert!(matches!(
            Bank::open(&data[..], &strict),
            Err(BankError::Consistency(ConsistencyError::ChecksumMismatch { .. }))
        ));
        let warn = BankOptions { checksum: ChecksumPolicy::Warn, ..strict };
        assert!(Bank::open(&data[..], &warn).is_ok());

        let mut bank = Bank::open(data.clone(), &warn).unwrap();
        assert!(bank.verify_checksum().is_err());
        bank.serialize();
        assert_eq!(bank.verify_checksum(), Ok(()));

        // without a configured baseline the stored value is trusted
        let rebased = Bank::open(&data[..], &BankOptions { checksum: ChecksumPolicy::Strict, ..BankOptions::default() })
            .unwrap();
        assert_eq!(rebased.verify_checksum(), Ok(()));
        assert_ne!(rebased.baseline(), Baseline::default());
    }

    #[test]
    fn new_bank_uses_plain_sum() {
        let bank = Bank::new();
        assert_eq!(bank.baseline(), Baseline::default());
        assert_eq!(bank.options().baseline, Some(Baseline::default()));
    }

    #[test]
    fn invalid_buffers_fail_fast() {
        assert!(matches!(Bank::from_buffer(vec![0u8; 10]), Err(BankError::Format(_))));
    }
}
