//! MIDI track parameter addressing.

use crate::range::RangeError;

/// Named position in a MIDI track's 32-byte value block or lock table.
///
/// Positions 30 and 31 are reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MidiParam {
    Note = 0,
    Velocity,
    Length,
    Note2,
    Note3,
    Note4,
    LfoSpeed1,
    LfoSpeed2,
    LfoSpeed3,
    LfoDepth1,
    LfoDepth2,
    LfoDepth3,
    ArpTranspose,
    ArpLegato,
    ArpMode,
    ArpSpeed,
    ArpRange,
    ArpNoteLength,
    PitchBend,
    Aftertouch,
    Cc1,
    Cc2,
    Cc3,
    Cc4,
    Cc5,
    Cc6,
    Cc7,
    Cc8,
    Cc9,
    Cc10,
}

impl MidiParam {
    pub const ALL: [MidiParam; 30] = [
        MidiParam::Note,
        MidiParam::Velocity,
        MidiParam::Length,
        MidiParam::Note2,
        MidiParam::Note3,
        MidiParam::Note4,
        MidiParam::LfoSpeed1,
        MidiParam::LfoSpeed2,
        MidiParam::LfoSpeed3,
        MidiParam::LfoDepth1,
        MidiParam::LfoDepth2,
        MidiParam::LfoDepth3,
        MidiParam::ArpTranspose,
        MidiParam::ArpLegato,
        MidiParam::ArpMode,
        MidiParam::ArpSpeed,
        MidiParam::ArpRange,
        MidiParam::ArpNoteLength,
        MidiParam::PitchBend,
        MidiParam::Aftertouch,
        MidiParam::Cc1,
        MidiParam::Cc2,
        MidiParam::Cc3,
        MidiParam::Cc4,
        MidiParam::Cc5,
        MidiParam::Cc6,
        MidiParam::Cc7,
        MidiParam::Cc8,
        MidiParam::Cc9,
        MidiParam::Cc10,
    ];

    pub fn from_index(index: usize) -> Result<Self, RangeError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| RangeError::new("midi param", index as i64, 0, 29))
    }

    /// CC value slot 1-10.
    pub fn cc(n: u8) -> Result<Self, RangeError> {
        RangeError::check_u8("midi cc", n, 1, 10)?;
        Self::from_index(MidiParam::Cc1 as usize + n as usize - 1)
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}
