//! Recorder buffer settings.

use serde::Serialize;

use crate::range::RangeError;

/// Where a recorder buffer takes its audio from.
///
/// The file spreads this over three exclusive fields: external inputs A/B,
/// external inputs C/D, and an internal source (track 1-8 or main).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingSource {
    #[default]
    Off,
    InputAb,
    InputA,
    InputB,
    InputCd,
    InputC,
    InputD,
    /// Internal track 1-8
    Track(u8),
    Main,
}

const SRC3_MAIN: u8 = 9;

impl RecordingSource {
    /// Decode the `(in_ab, in_cd, src3)` fields. The internal source wins,
    /// then A/B, then C/D.
    pub fn from_fields(in_ab: u8, in_cd: u8, src3: u8) -> Result<Self, RangeError> {
        match src3 {
            0 => {}
            1..=8 => return Ok(RecordingSource::Track(src3)),
            SRC3_MAIN => return Ok(RecordingSource::Main),
            _ => return Err(RangeError::new("recorder src3", src3 as i64, 0, 9)),
        }
        match in_ab {
            0 => {}
            1 => return Ok(RecordingSource::InputAb),
            2 => return Ok(RecordingSource::InputA),
            3 => return Ok(RecordingSource::InputB),
            _ => return Err(RangeError::new("recorder in_ab", in_ab as i64, 0, 3)),
        }
        match in_cd {
            0 => Ok(RecordingSource::Off),
            1 => Ok(RecordingSource::InputCd),
            2 => Ok(RecordingSource::InputC),
            3 => Ok(RecordingSource::InputD),
            _ => Err(RangeError::new("recorder in_cd", in_cd as i64, 0, 3)),
        }
    }

    /// Encode as `[in_ab, in_cd, src3]` with the unused fields zeroed.
    pub fn to_fields(self) -> Result<[u8; 3], RangeError> {
        Ok(match self {
            RecordingSource::Off => [0, 0, 0],
            RecordingSource::InputAb => [1, 0, 0],
            RecordingSource::InputA => [2, 0, 0],
            RecordingSource::InputB => [3, 0, 0],
            RecordingSource::InputCd => [0, 1, 0],
            RecordingSource::InputC => [0, 2, 0],
            RecordingSource::InputD => [0, 3, 0],
            RecordingSource::Track(n) => [0, 0, RangeError::check_u8("recorder track", n, 1, 8)?],
            RecordingSource::Main => [0, 0, SRC3_MAIN],
        })
    }
}

/// How recording is started and sustained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RecTrigMode {
    /// Record once for the full length
    #[default]
    One = 0,
    /// Record once, releasable
    One2 = 1,
    /// Record while held
    Hold = 2,
}

impl RecTrigMode {
    pub fn from_code(code: u8) -> Result<Self, RangeError> {
        match code {
            0 => Ok(RecTrigMode::One),
            1 => Ok(RecTrigMode::One2),
            2 => Ok(RecTrigMode::Hold),
            _ => Err(RangeError::new("recorder trig mode", code as i64, 0, 2)),
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Step counts selectable for quantized record start and playback.
pub const QUANTIZE_STEPS: [u16; 16] = [1, 2, 3, 4, 6, 8, 12, 16, 24, 32, 48, 64, 96, 128, 192, 256];

const QUANTIZE_OFF: u8 = 255;

/// Quantization of recording start (QREC) or playback (QPL).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QRecMode {
    /// Wait for the pattern loop
    #[default]
    PatternLength,
    /// Wait for the next multiple of this many steps
    Steps(u16),
    Off,
}

impl QRecMode {
    pub fn from_code(code: u8) -> Result<Self, RangeError> {
        match code {
            0 => Ok(QRecMode::PatternLength),
            1..=16 => Ok(QRecMode::Steps(QUANTIZE_STEPS[code as usize - 1])),
            QUANTIZE_OFF => Ok(QRecMode::Off),
            _ => Err(RangeError::new("quantize mode", code as i64, 0, 16)),
        }
    }

    pub fn to_code(self) -> Result<u8, RangeError> {
        match self {
            QRecMode::PatternLength => Ok(0),
            QRecMode::Off => Ok(QUANTIZE_OFF),
            QRecMode::Steps(n) => QUANTIZE_STEPS
                .iter()
                .position(|&s| s == n)
                .map(|i| i as u8 + 1)
                .ok_or_else(|| RangeError::new("quantize steps", n as i64, 1, 256)),
        }
    }
}

/// Recording length stored as a code 0-64.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingLength {
    /// Displayed length 1-63 (stored as `steps - 1`)
    Steps(u8),
    /// Displayed as 64
    Max,
}

const RLEN_MAX: u8 = 64;
const RLEN_STEPS_MAX: u8 = 63;

impl RecordingLength {
    /// Code 63 displays as 64 and reads as [`RecordingLength::Max`].
    pub fn from_code(code: u8) -> Result<Self, RangeError> {
        match code {
            0..=62 => Ok(RecordingLength::Steps(code + 1)),
            63 | RLEN_MAX => Ok(RecordingLength::Max),
            _ => Err(RangeError::new("recording length", code as i64, 0, RLEN_MAX as i64)),
        }
    }

    pub fn to_code(self) -> Result<u8, RangeError> {
        match self {
            RecordingLength::Max => Ok(RLEN_MAX),
            RecordingLength::Steps(n) => Ok(RangeError::check_u8("recording length", n, 1, RLEN_STEPS_MAX)? - 1),
        }
    }
}

impl Default for RecordingLength {
    fn default() -> Self {
        RecordingLength::Steps(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_field_priority() {
        assert_eq!(RecordingSource::from_fields(1, 2, 3), Ok(RecordingSource::Track(3)));
        assert_eq!(RecordingSource::from_fields(1, 2, 9), Ok(RecordingSource::Main));
        assert_eq!(RecordingSource::from_fields(2, 1, 0), Ok(RecordingSource::InputA));
        assert_eq!(RecordingSource::from_fields(0, 3, 0), Ok(RecordingSource::InputD));
        assert_eq!(RecordingSource::from_fields(0, 0, 0), Ok(RecordingSource::Off));
        assert!(RecordingSource::from_fields(0, 0, 10).is_err());
    }

    #[test]
    fn source_encoding_zeroes_other_fields() {
        assert_eq!(RecordingSource::Track(5).to_fields(), Ok([0, 0, 5]));
        assert_eq!(RecordingSource::InputCd.to_fields(), Ok([0, 1, 0]));
        assert!(RecordingSource::Track(0).to_fields().is_err());
        for src in [RecordingSource::InputB, RecordingSource::Main, RecordingSource::Track(8)] {
            let [ab, cd, s3] = src.to_fields().unwrap();
            assert_eq!(RecordingSource::from_fields(ab, cd, s3), Ok(src));
        }
    }

    #[test]
    fn quantize_codes() {
        assert_eq!(QRecMode::from_code(0), Ok(QRecMode::PatternLength));
        assert_eq!(QRecMode::from_code(4), Ok(QRecMode::Steps(4)));
        assert_eq!(QRecMode::from_code(16), Ok(QRecMode::Steps(256)));
        assert_eq!(QRecMode::from_code(255), Ok(QRecMode::Off));
        assert!(QRecMode::from_code(17).is_err());
        assert_eq!(QRecMode::Steps(12).to_code(), Ok(7));
        assert!(QRecMode::Steps(5).to_code().is_err());
    }

    #[test]
    fn recording_length_codes() {
        assert_eq!(RecordingLength::from_code(15), Ok(RecordingLength::Steps(16)));
        assert_eq!(RecordingLength::from_code(64), Ok(RecordingLength::Max));
        assert_eq!(RecordingLength::default().to_code(), Ok(15));
        assert!(RecordingLength::Steps(0).to_code().is_err());
    }

    #[test]
    fn recording_length_tops_out_at_max() {
        assert_eq!(RecordingLength::Steps(63).to_code(), Ok(62));
        assert_eq!(RecordingLength::from_code(62), Ok(RecordingLength::Steps(63)));
        assert!(RecordingLength::Steps(64).to_code().is_err());
        assert_eq!(RecordingLength::from_code(63), Ok(RecordingLength::Max));
        assert_eq!(RecordingLength::Max.to_code(), Ok(64));
        assert!(RecordingLength::from_code(65).is_err());
    }

    #[test]
    fn serialized_names() {
        assert_eq!(serde_json::to_value(RecordingLength::Max).unwrap(), serde_json::json!("max"));
        assert_eq!(serde_json::to_value(RecordingLength::Steps(16)).unwrap(), serde_json::json!({ "steps": 16 }));
        assert_eq!(serde_json::to_value(RecordingSource::Track(3)).unwrap(), serde_json::json!({ "track": 3 }));
        assert_eq!(serde_json::to_value(QRecMode::PatternLength).unwrap(), serde_json::json!("pattern_length"));
    }
}
