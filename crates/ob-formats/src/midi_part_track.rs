//! MIDI track settings of a part.

use ob_ir::{MidiParam, RangeError};
use serde::Serialize;

use crate::layout::*;

/// Setup of one of a MIDI track's three LFOs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MidiLfoSetup {
    pub destination: u8,
    pub wave: u8,
    pub multiplier: u8,
    pub trigger: u8,
}

/// View over one MIDI track of a part.
#[derive(Clone, Copy, Debug)]
pub struct MidiPartTrack<B> {
    part: B,
    index: usize,
}

fn optional(value: u8) -> Option<u8> {
    (value != MIDI_OFF).then_some(value)
}

impl<B: AsRef<[u8]>> MidiPartTrack<B> {
    pub(crate) fn wrap(part: B, index: usize) -> Self {
        debug_assert_eq!(part.as_ref().len(), PART_SIZE);
        debug_assert!(index < TRACK_COUNT);
        Self { part, index }
    }

    fn bytes(&self) -> &[u8] {
        self.part.as_ref()
    }

    fn setup(&self, field: usize) -> u8 {
        self.bytes()[PART_MIDI_SETUP + self.index * MIDI_SETUP_SIZE + field]
    }

    pub fn track(&self) -> usize {
        self.index + 1
    }

    /// MIDI channel, 1-16.
    pub fn channel(&self) -> u8 {
        self.setup(MIDI_CHANNEL) + 1
    }

    /// Bank select, or `None` when not sent.
    pub fn bank(&self) -> Option<u8> {
        optional(self.setup(MIDI_BANK))
    }

    pub fn program(&self) -> Option<u8> {
        optional(self.setup(MIDI_PROGRAM))
    }

    pub fn sub_bank(&self) -> Option<u8> {
        optional(self.setup(MIDI_SUB_BANK))
    }

    /// Part value of a MIDI parameter.
    pub fn value(&self, param: MidiParam) -> u8 {
        self.bytes()[PART_MIDI_VALUES + self.index * MIDI_VALUES_SIZE + param.index()]
    }

    /// Controller number sent by CC slot 1-10.
    pub fn cc_number(&self, cc: usize) -> Result<u8, RangeError> {
        let cc = RangeError::check("midi cc", cc, 1, 10)?;
        Ok(self.setup(MIDI_CC_NUMBERS + cc - 1))
    }

    pub fn arp_length(&self) -> u8 {
        self.setup(MIDI_ARP_LENGTH)
    }

    pub fn arp_key(&self) -> u8 {
        self.setup(MIDI_ARP_KEY)
    }

    /// LFO 1-3.
    pub fn lfo(&self, lfo: usize) -> Result<MidiLfoSetup, RangeError> {
        let i = RangeError::check("midi lfo", lfo, 1, 3)? - 1;
        Ok(MidiLfoSetup {
            destination: self.setup(MIDI_LFO_DESTINATIONS + i),
            wave: self.setup(MIDI_LFO_WAVES + i),
            multiplier: self.setup(MIDI_LFO_MULTIPLIERS + i),
            trigger: self.setup(MIDI_LFO_TRIGGERS + i),
        })
    }

    pub fn same_settings<C: AsRef<[u8]>>(&self, other: &MidiPartTrack<C>) -> bool {
        MIDI_PART_TRACK_REGIONS.iter().all(|&(base, stride)| {
            let a = base + self.index * stride;
            let b = base + other.index * stride;
            self.bytes()[a..a + stride] == other.bytes()[b..b + stride]
        })
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> MidiPartTrack<B> {
    fn set_setup(&mut self, field: usize, value: u8) {
        let at = PART_MIDI_SETUP + self.index * MIDI_SETUP_SIZE + field;
        self.part.as_mut()[at] = value;
    }

    fn set_optional(&mut self, what: &'static str, field: usize, value: Option<u8>) -> Result<(), RangeError> {
        let code = match value {
            Some(v) => RangeError::check_u8(what, v, 0, 127)?,
            None => MIDI_OFF,
        };
        self.set_setup(field, code);
        Ok(())
    }

    pub fn set_channel(&mut self, channel: u8) -> Result<(), RangeError> {
        let channel = RangeError::check_u8("midi channel", channel, 1, 16)?;
        self.set_setup(MIDI_CHANNEL, channel - 1);
        Ok(())
    }

    pub fn set_bank(&mut self, bank: Option<u8>) -> Result<(), RangeError> {
        self.set_optional("midi bank", MIDI_BANK, bank)
    }

    pub fn set_program(&mut self, program: Option<u8>) -> Result<(), RangeError> {
        self.set_optional("midi program", MIDI_PROGRAM, program)
    }

    pub fn set_sub_bank(&mut self, sub_bank: Option<u8>) -> Result<(), RangeError> {
        self.set_optional("midi sub bank", MIDI_SUB_BANK, sub_bank)
    }

    pub fn set_value(&mut self, param: MidiParam, value: u8) -> Result<(), RangeError> {
        let value = RangeError::check_u8("midi value", value, 0, 127)?;
        let at = PART_MIDI_VALUES + self.index * MIDI_VALUES_SIZE + param.index();
        self.part.as_mut()[at] = value;
        Ok(())
    }

    pub fn set_cc_number(&mut self, cc: usize, number: u8) -> Result<(), RangeError> {
        let cc = RangeError::check("midi cc", cc, 1, 10)?;
        let number = RangeError::check_u8("cc number", number, 0, 127)?;
        self.set_setup(MIDI_CC_NUMBERS + cc - 1, number);
        Ok(())
    }

    /// Arpeggiator sequence length, 1-16.
    pub fn set_arp_length(&mut self, length: u8) -> Result<(), RangeError> {
        let length = RangeError::check_u8("arp length", length, 1, 16)?;
        self.set_setup(MIDI_ARP_LENGTH, length);
        Ok(())
    }

    pub fn set_arp_key(&mut self, key: u8) {
        self.set_setup(MIDI_ARP_KEY, key);
    }

    pub fn set_lfo(&mut self, lfo: usize, setup: MidiLfoSetup) -> Result<(), RangeError> {
        let i = RangeError::check("midi lfo", lfo, 1, 3)? - 1;
        self.set_setup(MIDI_LFO_DESTINATIONS + i, setup.destination);
        self.set_setup(MIDI_LFO_WAVES + i, setup.wave);
        self.set_setup(MIDI_LFO_MULTIPLIERS + i, setup.multiplier);
        self.set_setup(MIDI_LFO_TRIGGERS + i, setup.trigger);
        Ok(())
    }

    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &MidiPartTrack<C>) {
        for &(base, stride) in MIDI_PART_TRACK_REGIONS.iter() {
            let src = base + other.index * stride;
            let dst = base + self.index * stride;
            self.part.as_mut()[dst..dst + stride].copy_from_slice(&other.bytes()[src..src + stride]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part() -> Vec<u8> {
        let mut buf = vec![0u8; PART_SIZE];
        crate::template::init_part(&mut buf, 0);
        buf
    }

    #[test]
    fn defaults() {
        let buf = part();
        let track = MidiPartTrack::wrap(&buf[..], 3);
        assert_eq!(track.channel(), 4);
        assert_eq!(track.bank(), None);
        assert_eq!(track.program(), None);
        assert_eq!(track.value(MidiParam::Note), 48);
        assert_eq!(track.value(MidiParam::Velocity), 100);
        assert_eq!(track.value(MidiParam::Cc1), 127);
        assert_eq!(track.cc_number(1), Ok(7));
        assert_eq!(track.cc_number(10), Ok(76));
        assert!(track.cc_number(0).is_err());
        assert_eq!(track.arp_length(), 16);
    }

    #[test]
    fn setters() {
        let mut buf = part();
        let mut track = MidiPartTrack::wrap(&mut buf[..], 0);
        track.set_program(Some(12)).unwrap();
        assert_eq!(track.program(), Some(12));
        track.set_program(None).unwrap();
        assert_eq!(track.program(), None);
        assert!(track.set_bank(Some(128)).is_err());
        assert!(track.set_channel(17).is_err());
        track.set_channel(16).unwrap();
        assert_eq!(track.channel(), 16);

        let lfo = MidiLfoSetup { destination: 3, wave: 2, multiplier: 1, trigger: 4 };
        track.set_lfo(3, lfo).unwrap();
        assert_eq!(track.lfo(3), Ok(lfo));
        assert_eq!(track.lfo(1), Ok(MidiLfoSetup::default()));
    }

    #[test]
    fn copy_between_tracks() {
        let mut buf = part();
        MidiPartTrack::wrap(&mut buf[..], 1).set_value(MidiParam::Note, 60).unwrap();
        let source = MidiPartTrack::wrap(buf.clone(), 1);
        let mut dest = MidiPartTrack::wrap(&mut buf[..], 6);
        dest.copy_from(&source);
        assert_eq!(dest.value(MidiParam::Note), 60);
        assert_eq!(dest.channel(), 2);
        assert!(dest.same_settings(&source));
    }
}
