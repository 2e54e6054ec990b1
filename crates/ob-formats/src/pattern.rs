//! Pattern blocks: eight audio and eight MIDI tracks plus pattern settings.

use ob_ir::{RangeError, ScaleMultiplier, STEP_COUNT};

use crate::layout::*;
use crate::template;
use crate::track::{AudioTrack, MidiTrack};
use crate::FormatError;

/// View over one pattern.
#[derive(Clone, Copy, Debug)]
pub struct Pattern<B> {
    data: B,
}

fn track_index(track: usize) -> Result<usize, RangeError> {
    Ok(RangeError::check("track", track, 1, TRACK_COUNT)? - 1)
}

fn audio_range(track: usize) -> Result<core::ops::Range<usize>, RangeError> {
    let start = PATTERN_AUDIO_TRACKS + track_index(track)? * AUDIO_TRACK_SIZE;
    Ok(start..start + AUDIO_TRACK_SIZE)
}

fn midi_range(track: usize) -> Result<core::ops::Range<usize>, RangeError> {
    let start = PATTERN_MIDI_TRACKS + track_index(track)? * MIDI_TRACK_SIZE;
    Ok(start..start + MIDI_TRACK_SIZE)
}

impl Pattern<Vec<u8>> {
    /// An owned pattern with default tracks and settings.
    pub fn new() -> Self {
        let mut data = vec![0u8; PATTERN_SIZE];
        template::init_pattern(&mut data);
        Self { data }
    }
}

impl Default for Pattern<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AsRef<[u8]>> Pattern<B> {
    pub fn from_bytes(data: B) -> Result<Self, FormatError> {
        let found = data.as_ref().len();
        if found != PATTERN_SIZE {
            return Err(FormatError::WrongLength { expected: PATTERN_SIZE, found });
        }
        if !data.as_ref().starts_with(PATTERN_HEADER) {
            return Err(FormatError::InvalidHeader);
        }
        Ok(Self { data })
    }

    pub(crate) fn wrap(data: B) -> Self {
        debug_assert_eq!(data.as_ref().len(), PATTERN_SIZE);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.data
    }

    /// Audio track 1-8.
    pub fn audio_track(&self, track: usize) -> Result<AudioTrack<&[u8]>, RangeError> {
        let range = audio_range(track)?;
        Ok(AudioTrack::wrap(&self.as_bytes()[range]))
    }

    /// MIDI track 1-8.
    pub fn midi_track(&self, track: usize) -> Result<MidiTrack<&[u8]>, RangeError> {
        let range = midi_range(track)?;
        Ok(MidiTrack::wrap(&self.as_bytes()[range]))
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = AudioTrack<&[u8]>> + '_ {
        self.as_bytes()[PATTERN_AUDIO_TRACKS..PATTERN_MIDI_TRACKS]
            .chunks_exact(AUDIO_TRACK_SIZE)
            .map(AudioTrack::wrap)
    }

    pub fn midi_tracks(&self) -> impl Iterator<Item = MidiTrack<&[u8]>> + '_ {
        self.as_bytes()[PATTERN_MIDI_TRACKS..PATTERN_MIDI_TRACKS + TRACK_COUNT * MIDI_TRACK_SIZE]
            .chunks_exact(MIDI_TRACK_SIZE)
            .map(MidiTrack::wrap)
    }

    /// Pattern length in steps.
    pub fn length(&self) -> u8 {
        self.as_bytes()[PATTERN_LENGTH]
    }

    pub fn scale(&self) -> Result<ScaleMultiplier, RangeError> {
        ScaleMultiplier::from_code(self.as_bytes()[PATTERN_SCALE])
    }

    /// Assigned part, 1-4.
    pub fn part(&self) -> Result<usize, RangeError> {
        let stored = self.as_bytes()[PATTERN_PART] as usize;
        RangeError::check("pattern part", stored + 1, 1, PART_COUNT)
    }

    pub fn cloned(&self) -> Pattern<Vec<u8>> {
        Pattern { data: self.as_bytes().to_vec() }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Pattern<B> {
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.data.as_mut()
    }

    pub fn audio_track_mut(&mut self, track: usize) -> Result<AudioTrack<&mut [u8]>, RangeError> {
        let range = audio_range(track)?;
        Ok(AudioTrack::wrap(&mut self.bytes_mut()[range]))
    }

    pub fn midi_track_mut(&mut self, track: usize) -> Result<MidiTrack<&mut [u8]>, RangeError> {
        let range = midi_range(track)?;
        Ok(MidiTrack::wrap(&mut self.bytes_mut()[range]))
    }

    pub fn set_length(&mut self, length: u8) -> Result<(), RangeError> {
        let length = RangeError::check_u8("pattern length", length, 1, STEP_COUNT)?;
        self.bytes_mut()[PATTERN_LENGTH] = length;
        Ok(())
    }

    pub fn set_scale(&mut self, scale: ScaleMultiplier) {
        self.bytes_mut()[PATTERN_SCALE] = scale.code();
    }

    pub fn set_part(&mut self, part: usize) -> Result<(), RangeError> {
        let part = RangeError::check("part", part, 1, PART_COUNT)?;
        self.bytes_mut()[PATTERN_PART] = (part - 1) as u8;
        Ok(())
    }

    /// Copy another pattern over this one. Track ids travel with the data,
    /// which is the same for every pattern.
    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &Pattern<C>) {
        self.bytes_mut().copy_from_slice(other.as_bytes());
    }
}

impl<B: AsRef<[u8]>, C: AsRef<[u8]>> PartialEq<Pattern<C>> for Pattern<B> {
    fn eq(&self, other: &Pattern<C>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
