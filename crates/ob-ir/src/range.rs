//! Domain checks for indices and field values.

use thiserror::Error;

/// An index or value outside its domain.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{what} {value} outside {min}..={max}")]
pub struct RangeError {
    pub what: &'static str,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

impl RangeError {
    pub fn new(what: &'static str, value: i64, min: i64, max: i64) -> Self {
        Self { what, value, min, max }
    }

    /// Return `value` if it lies in `min..=max`.
    pub fn check(what: &'static str, value: usize, min: usize, max: usize) -> Result<usize, RangeError> {
        if value < min || value > max {
            return Err(Self::new(what, value as i64, min as i64, max as i64));
        }
        Ok(value)
    }

    /// Byte-sized variant of [`RangeError::check`].
    pub fn check_u8(what: &'static str, value: u8, min: u8, max: u8) -> Result<u8, RangeError> {
        if value < min || value > max {
            return Err(Self::new(what, value as i64, min as i64, max as i64));
        }
        Ok(value)
    }
}
