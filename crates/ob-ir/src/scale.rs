//! Pattern and track speed multipliers.

use serde::{Serialize, Serializer};

use crate::range::RangeError;

/// Playback speed relative to the project tempo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScaleMultiplier {
    /// 2x
    Double = 0,
    /// 3/2x
    ThreeHalves = 1,
    /// 1x
    #[default]
    Normal = 2,
    /// 3/4x
    ThreeQuarters = 3,
    /// 1/2x
    Half = 4,
    /// 1/4x
    Quarter = 5,
    /// 1/8x
    Eighth = 6,
}

impl ScaleMultiplier {
    pub const ALL: [ScaleMultiplier; 7] = [
        ScaleMultiplier::Double,
        ScaleMultiplier::ThreeHalves,
        ScaleMultiplier::Normal,
        ScaleMultiplier::ThreeQuarters,
        ScaleMultiplier::Half,
        ScaleMultiplier::Quarter,
        ScaleMultiplier::Eighth,
    ];

    pub fn from_code(code: u8) -> Result<Self, RangeError> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| RangeError::new("scale multiplier", code as i64, 0, 6))
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Speed as (numerator, denominator).
    pub const fn ratio(self) -> (u8, u8) {
        match self {
            ScaleMultiplier::Double => (2, 1),
            ScaleMultiplier::ThreeHalves => (3, 2),
            ScaleMultiplier::Normal => (1, 1),
            ScaleMultiplier::ThreeQuarters => (3, 4),
            ScaleMultiplier::Half => (1, 2),
            ScaleMultiplier::Quarter => (1, 4),
            ScaleMultiplier::Eighth => (1, 8),
        }
    }
}

impl core::fmt::Display for ScaleMultiplier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.ratio() {
            (n, 1) => write!(f, "{}x", n),
            (n, d) => write!(f, "{}/{}x", n, d),
        }
    }
}

impl Serialize for ScaleMultiplier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
