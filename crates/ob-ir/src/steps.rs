//! Sets of sequencer steps.

use arrayvec::ArrayVec;
use serde::{Serialize, Serializer};

use crate::range::RangeError;

/// Number of steps in a pattern track.
pub const STEP_COUNT: u8 = 64;

/// An ordered set of step numbers in `1..=64`.
///
/// Bit `n - 1` of the inner word is set when step `n` is a member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StepSet(u64);

impl StepSet {
    /// The empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// All 64 steps.
    pub const fn all() -> Self {
        Self(u64::MAX)
    }

    /// Build a set from step numbers, failing on the first out-of-range step.
    pub fn from_steps<I>(steps: I) -> Result<Self, RangeError>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut set = Self::new();
        for step in steps {
            set.insert(step)?;
        }
        Ok(set)
    }

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Add a step. Returns `true` if it was not already present.
    pub fn insert(&mut self, step: u8) -> Result<bool, RangeError> {
        let bit = Self::bit(step)?;
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        Ok(fresh)
    }

    /// Remove a step. Returns `true` if it was present.
    pub fn remove(&mut self, step: u8) -> Result<bool, RangeError> {
        let bit = Self::bit(step)?;
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        Ok(present)
    }

    /// Out-of-range steps are never members.
    pub fn contains(self, step: u8) -> bool {
        Self::bit(step).map(|bit| self.0 & bit != 0).unwrap_or(false)
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over member steps in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=STEP_COUNT).filter(move |&s| self.0 & (1u64 << (s - 1)) != 0)
    }

    /// Member steps as a fixed-capacity list.
    pub fn to_vec(self) -> ArrayVec<u8, 64> {
        self.iter().collect()
    }

    fn bit(step: u8) -> Result<u64, RangeError> {
        RangeError::check_u8("step", step, 1, STEP_COUNT)?;
        Ok(1u64 << (step - 1))
    }
}

/// Serialized as the ascending list of step numbers.
impl Serialize for StepSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_iterate_in_order() {
        let set = StepSet::from_steps([13, 1, 9, 5]).unwrap();
        assert_eq!(set.to_vec().as_slice(), &[1, 5, 9, 13]);
        assert_eq!(set.len(), 4);
        assert!(set.contains(9));
        assert!(!set.contains(2));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(StepSet::from_steps([0]).is_err());
        assert!(StepSet::from_steps([65]).is_err());
        assert!(!StepSet::all().contains(65));
    }

    #[test]
    fn remove_reports_presence() {
        let mut set = StepSet::from_steps([64]).unwrap();
        assert_eq!(set.remove(64), Ok(true));
        assert_eq!(set.remove(64), Ok(false));
        assert!(set.is_empty());
    }

    #[test]
    fn all_has_every_step() {
        assert_eq!(StepSet::all().len(), 64);
        assert_eq!(StepSet::all().iter().last(), Some(64));
    }

    #[test]
    fn serializes_as_step_list() {
        let set = StepSet::from_steps([13, 1, 64]).unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[1,13,64]");
        assert_eq!(serde_json::to_string(&StepSet::new()).unwrap(), "[]");
    }
}
