//! Trig conditions and their packed two-byte step field.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::range::RangeError;

/// Probability ladder in percent, indexed from condition code 9.
pub const PROBABILITY_LADDER: [u8; 21] = [
    1, 2, 4, 6, 9, 13, 19, 25, 33, 41, 50, 59, 67, 75, 81, 87, 91, 94, 96, 98, 99,
];

const FIRST_PROBABILITY: u8 = 9;
const FIRST_REPETITION: u8 = 30;

/// Highest valid condition code.
pub const MAX_CONDITION_CODE: u8 = 64;

/// Condition gating whether a trig fires.
///
/// Discriminants are the on-disk codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Condition {
    /// Always fires
    #[default]
    None = 0,
    Fill,
    NotFill,
    Pre,
    NotPre,
    Nei,
    NotNei,
    First,
    NotFirst,
    Percent1,
    Percent2,
    Percent4,
    Percent6,
    Percent9,
    Percent13,
    Percent19,
    Percent25,
    Percent33,
    Percent41,
    Percent50,
    Percent59,
    Percent67,
    Percent75,
    Percent81,
    Percent87,
    Percent91,
    Percent94,
    Percent96,
    Percent98,
    Percent99,
    // === Trig on repetition X of every Y loops ===
    T1R2,
    T2R2,
    T1R3,
    T2R3,
    T3R3,
    T1R4,
    T2R4,
    T3R4,
    T4R4,
    T1R5,
    T2R5,
    T3R5,
    T4R5,
    T5R5,
    T1R6,
    T2R6,
    T3R6,
    T4R6,
    T5R6,
    T6R6,
    T1R7,
    T2R7,
    T3R7,
    T4R7,
    T5R7,
    T6R7,
    T7R7,
    T1R8,
    T2R8,
    T3R8,
    T4R8,
    T5R8,
    T6R8,
    T7R8,
    T8R8,
}

const ALL: [Condition; 65] = {
    use Condition::*;
    [
        None, Fill, NotFill, Pre, NotPre, Nei, NotNei, First, NotFirst,
        Percent1, Percent2, Percent4, Percent6, Percent9, Percent13, Percent19,
        Percent25, Percent33, Percent41, Percent50, Percent59, Percent67, Percent75,
        Percent81, Percent87, Percent91, Percent94, Percent96, Percent98, Percent99,
        T1R2, T2R2,
        T1R3, T2R3, T3R3,
        T1R4, T2R4, T3R4, T4R4,
        T1R5, T2R5, T3R5, T4R5, T5R5,
        T1R6, T2R6, T3R6, T4R6, T5R6, T6R6,
        T1R7, T2R7, T3R7, T4R7, T5R7, T6R7, T7R7,
        T1R8, T2R8, T3R8, T4R8, T5R8, T6R8, T7R8, T8R8,
    ]
};

impl Condition {
    /// Decode an on-disk code (0-64).
    pub fn from_code(code: u8) -> Result<Self, RangeError> {
        ALL.get(code as usize)
            .copied()
            .ok_or_else(|| RangeError::new("condition code", code as i64, 0, MAX_CONDITION_CODE as i64))
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Snap a probability to the nearest ladder point.
    ///
    /// `None` and `1.0` give [`Condition::None`]. Ties resolve to the lower point.
    pub fn from_probability(probability: Option<f32>) -> Result<Self, RangeError> {
        let p = match probability {
            Some(p) => p,
            None => return Ok(Condition::None),
        };
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            let percent = if p.is_finite() { (p * 100.0).round() as i64 } else { i64::MAX };
            return Err(RangeError::new("probability percent", percent, 0, 100));
        }
        if p >= 1.0 {
            return Ok(Condition::None);
        }
        let mut best = 0;
        let mut best_distance = f32::MAX;
        for (i, &percent) in PROBABILITY_LADDER.iter().enumerate() {
            let distance = (percent as f32 / 100.0 - p).abs();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        Self::from_code(FIRST_PROBABILITY + best as u8)
    }

    /// Probability in `0.0..=1.0` for ladder conditions.
    pub fn probability(self) -> Option<f32> {
        self.probability_percent().map(|p| p as f32 / 100.0)
    }

    pub fn probability_percent(self) -> Option<u8> {
        let code = self.code();
        if (FIRST_PROBABILITY..FIRST_REPETITION).contains(&code) {
            Some(PROBABILITY_LADDER[(code - FIRST_PROBABILITY) as usize])
        } else {
            None
        }
    }

    /// "Trig on repetition `trig` of every `every` loops", `every` in 2..=8.
    pub fn repetition(trig: u8, every: u8) -> Result<Self, RangeError> {
        RangeError::check_u8("repetition cycle", every, 2, 8)?;
        RangeError::check_u8("repetition", trig, 1, every)?;
        Self::from_code(FIRST_REPETITION + repetition_base(every) + trig - 1)
    }

    /// `(trig, every)` for repetition conditions.
    pub fn as_repetition(self) -> Option<(u8, u8)> {
        let code = self.code();
        if code < FIRST_REPETITION {
            return None;
        }
        let offset = code - FIRST_REPETITION;
        (2..=8u8).rev().find_map(|every| {
            let base = repetition_base(every);
            (offset >= base).then(|| (offset - base + 1, every))
        })
    }

    /// Fill/pre/neighbor/first gates and their negations.
    pub fn is_logical(self) -> bool {
        (1..FIRST_PROBABILITY).contains(&self.code())
    }
}

/// Offset of `T1R{every}` from the first repetition code.
const fn repetition_base(every: u8) -> u8 {
    (every - 1) * every / 2 - 1
}

/// Packed two-byte per-step condition field.
///
/// Byte 0 holds the repeat count in its top 3 bits over an opaque 5-bit
/// microtiming value. Byte 1 holds the condition code in its low 7 bits and
/// the "uses microtiming" flag in bit 7.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TrigCondition {
    bytes: [u8; 2],
}

impl TrigCondition {
    /// A field with `condition`, one repeat and no microtiming.
    pub const fn new(condition: Condition) -> Self {
        Self { bytes: [0, condition as u8] }
    }

    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self { bytes }
    }

    pub const fn to_bytes(self) -> [u8; 2] {
        self.bytes
    }

    /// Raw 7-bit condition code, which may be undecodable.
    pub const fn code(self) -> u8 {
        self.bytes[1] & 0x7F
    }

    pub fn condition(self) -> Result<Condition, RangeError> {
        Condition::from_code(self.code())
    }

    /// Replace the condition, keeping the microtiming flag and repeat count.
    pub fn set_condition(&mut self, condition: Condition) {
        self.bytes[1] = (self.bytes[1] & 0x80) | condition.code();
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.set_condition(condition);
        self
    }

    /// Repeat count, 1-8.
    pub const fn repeats(self) -> u8 {
        (self.bytes[0] >> 5) + 1
    }

    /// Set the repeat count, keeping the microtiming bits and the condition.
    pub fn set_repeats(&mut self, repeats: u8) -> Result<(), RangeError> {
        RangeError::check_u8("repeat count", repeats, 1, 8)?;
        self.bytes[0] = ((repeats - 1) << 5) | (self.bytes[0] & 0x1F);
        Ok(())
    }

    pub const fn micro_timing(self) -> u8 {
        self.bytes[0] & 0x1F
    }

    pub fn set_micro_timing(&mut self, value: u8) {
        self.bytes[0] = (self.bytes[0] & 0xE0) | (value & 0x1F);
    }

    pub const fn uses_micro_timing(self) -> bool {
        self.bytes[1] & 0x80 != 0
    }

    pub fn set_uses_micro_timing(&mut self, on: bool) {
        if on {
            self.bytes[1] |= 0x80;
        } else {
            self.bytes[1] &= 0x7F;
        }
    }
}

impl From<Condition> for TrigCondition {
    fn from(condition: Condition) -> Self {
        Self::new(condition)
    }
}

/// Serialized by meaning. An undecodable code yields a `null` condition
/// next to the raw `code`.
impl Serialize for TrigCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("TrigCondition", 5)?;
        s.serialize_field("condition", &self.condition().ok())?;
        s.serialize_field("code", &self.code())?;
        s.serialize_field("repeats", &self.repeats())?;
        s.serialize_field("micro_timing", &self.micro_timing())?;
        s.serialize_field("uses_micro_timing", &self.uses_micro_timing())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_table() {
        for (code, cond) in ALL.iter().enumerate() {
            assert_eq!(cond.code() as usize, code);
        }
        assert_eq!(Condition::Fill.code(), 1);
        assert_eq!(Condition::NotFirst.code(), 8);
        assert_eq!(Condition::Percent1.code(), 9);
        assert_eq!(Condition::Percent99.code(), 29);
        assert_eq!(Condition::T1R2.code(), 30);
        assert_eq!(Condition::T8R8.code(), 64);
        assert!(Condition::from_code(65).is_err());
    }

    #[test]
    fn probability_snaps_to_nearest() {
        assert_eq!(Condition::from_probability(Some(0.30)), Ok(Condition::Percent33));
        assert_eq!(Condition::from_probability(Some(0.70)), Ok(Condition::Percent67));
        assert_eq!(Condition::from_probability(Some(0.0)), Ok(Condition::Percent1));
        assert_eq!(Condition::from_probability(Some(0.5)), Ok(Condition::Percent50));
        assert_eq!(Condition::from_probability(Some(1.0)), Ok(Condition::None));
        assert_eq!(Condition::from_probability(None), Ok(Condition::None));
        assert!(Condition::from_probability(Some(1.5)).is_err());
        assert!(Condition::from_probability(Some(f32::NAN)).is_err());
    }

    #[test]
    fn probability_round_trips_ladder() {
        assert_eq!(Condition::Percent33.probability_percent(), Some(33));
        assert_eq!(Condition::Fill.probability(), None);
    }

    #[test]
    fn repetition_codes_are_y_major() {
        assert_eq!(Condition::repetition(1, 2), Ok(Condition::T1R2));
        assert_eq!(Condition::repetition(2, 2), Ok(Condition::T2R2));
        assert_eq!(Condition::repetition(1, 3), Ok(Condition::T1R3));
        assert_eq!(Condition::repetition(3, 4), Ok(Condition::T3R4));
        assert_eq!(Condition::repetition(8, 8), Ok(Condition::T8R8));
        assert!(Condition::repetition(3, 2).is_err());
        assert!(Condition::repetition(1, 9).is_err());

        for code in 30..=64 {
            let cond = Condition::from_code(code).unwrap();
            let (trig, every) = cond.as_repetition().unwrap();
            assert_eq!(Condition::repetition(trig, every), Ok(cond));
        }
        assert_eq!(Condition::Percent99.as_repetition(), None);
    }

    #[test]
    fn repeats_and_condition_are_independent() {
        let mut tc = TrigCondition::new(Condition::Fill);
        tc.set_repeats(5).unwrap();
        assert_eq!(tc.condition(), Ok(Condition::Fill));
        assert_eq!(tc.repeats(), 5);

        tc.set_condition(Condition::T3R4);
        assert_eq!(tc.repeats(), 5);
        assert_eq!(tc.condition(), Ok(Condition::T3R4));
        assert!(tc.set_repeats(9).is_err());
        assert_eq!(tc.repeats(), 5);
    }

    #[test]
    fn opaque_bits_survive_rewrites() {
        let mut tc = TrigCondition::from_bytes([0b0001_0110, 0x80 | 3]);
        assert!(tc.uses_micro_timing());
        assert_eq!(tc.micro_timing(), 0b10110);

        tc.set_condition(Condition::Percent50);
        tc.set_repeats(8).unwrap();
        assert!(tc.uses_micro_timing());
        assert_eq!(tc.micro_timing(), 0b10110);
        assert_eq!(tc.to_bytes(), [0b1111_0110, 0x80 | 19]);
    }

    #[test]
    fn serializes_by_name() {
        assert_eq!(serde_json::to_value(Condition::NotFill).unwrap(), serde_json::json!("NOT_FILL"));
        assert_eq!(serde_json::to_value(Condition::Percent33).unwrap(), serde_json::json!("PERCENT33"));

        let mut trig = TrigCondition::new(Condition::Fill);
        trig.set_repeats(3).unwrap();
        trig.set_micro_timing(5);
        assert_eq!(
            serde_json::to_value(trig).unwrap(),
            serde_json::json!({
                "condition": "FILL",
                "code": 1,
                "repeats": 3,
                "micro_timing": 5,
                "uses_micro_timing": false,
            })
        );
        let raw = serde_json::to_value(TrigCondition::from_bytes([0, 0x7F])).unwrap();
        assert_eq!(raw["condition"], serde_json::Value::Null);
        assert_eq!(raw["code"], 127);
    }
}
