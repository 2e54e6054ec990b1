//! Per-pattern sequence data of one audio or MIDI track.

use core::marker::PhantomData;

use ob_ir::{MidiParam, PlockSlot, RangeError, ScaleMultiplier, StepSet, TrigCondition, STEP_COUNT};

use serde::Serialize;

use crate::layout::{
    TrackLayout, AUDIO_ONESHOT_MASK, AUDIO_RECORDER_MASKS, AUDIO_SLIDE_MASK, AUDIO_TRACK,
    CONDITION_SIZE, MASK_SIZE, MIDI_TRACK, PLOCK_TABLE_SIZE, TRACK_ID,
};
use crate::plock::PlockTable;
use crate::template;
use crate::trig_mask::{decode_mask, encode_mask, mask_position};
use crate::FormatError;

/// Distinguishes audio from MIDI track blocks.
pub trait TrackKind {
    const LAYOUT: TrackLayout;
}

/// Marker for audio pattern tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Audio;

/// Marker for MIDI pattern tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Midi;

impl TrackKind for Audio {
    const LAYOUT: TrackLayout = AUDIO_TRACK;
}

impl TrackKind for Midi {
    const LAYOUT: TrackLayout = MIDI_TRACK;
}

/// View over one track's block inside a pattern.
#[derive(Clone, Copy, Debug)]
pub struct TrackBlock<B, K> {
    data: B,
    kind: PhantomData<K>,
}

pub type AudioTrack<B> = TrackBlock<B, Audio>;
pub type MidiTrack<B> = TrackBlock<B, Midi>;

/// Snapshot of everything stored for one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StepState {
    pub active: bool,
    pub trigless: bool,
    pub condition: TrigCondition,
    pub plocks: PlockTable<[u8; PLOCK_TABLE_SIZE]>,
}

fn step_index(step: u8) -> Result<usize, RangeError> {
    Ok(RangeError::check_u8("step", step, 1, STEP_COUNT)? as usize - 1)
}

impl<K: TrackKind> TrackBlock<Vec<u8>, K> {
    /// An owned block with default settings for track index `id` (0-7).
    pub fn new(id: u8) -> Self {
        let mut data = vec![0u8; K::LAYOUT.size];
        template::init_track(&K::LAYOUT, &mut data, id);
        Self { data, kind: PhantomData }
    }
}

impl<K: TrackKind> Default for TrackBlock<Vec<u8>, K> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<B: AsRef<[u8]>, K: TrackKind> TrackBlock<B, K> {
    pub fn from_bytes(data: B) -> Result<Self, FormatError> {
        let found = data.as_ref().len();
        if found != K::LAYOUT.size {
            return Err(FormatError::WrongLength { expected: K::LAYOUT.size, found });
        }
        Ok(Self { data, kind: PhantomData })
    }

    pub(crate) fn wrap(data: B) -> Self {
        debug_assert_eq!(data.as_ref().len(), K::LAYOUT.size);
        Self { data, kind: PhantomData }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.data
    }

    /// Four-byte block tag.
    pub fn tag(&self) -> &[u8] {
        &self.as_bytes()[..4]
    }

    /// Stored track index, 0-7.
    pub fn track_id(&self) -> u8 {
        self.as_bytes()[TRACK_ID]
    }

    fn byte(&self, offset: usize) -> u8 {
        self.as_bytes()[offset]
    }

    fn mask(&self, offset: usize) -> StepSet {
        let mut mask = [0u8; MASK_SIZE];
        mask.copy_from_slice(&self.as_bytes()[offset..offset + MASK_SIZE]);
        decode_mask(&mask)
    }

    fn mask_bit(&self, offset: usize, step: u8) -> Result<bool, RangeError> {
        let (byte, bit) = mask_position(step)?;
        Ok(self.as_bytes()[offset + byte] & (1 << bit) != 0)
    }

    /// Steps with a trigger.
    pub fn trigs(&self) -> StepSet {
        self.mask(K::LAYOUT.trigger)
    }

    /// Steps with a trigless trig.
    pub fn trigless(&self) -> StepSet {
        self.mask(K::LAYOUT.trigless)
    }

    /// Steps flagged as carrying parameter locks.
    pub fn plock_steps(&self) -> StepSet {
        self.mask(K::LAYOUT.plock_mask)
    }

    pub fn swing_steps(&self) -> StepSet {
        self.mask(K::LAYOUT.swing_mask)
    }

    pub fn is_active(&self, step: u8) -> Result<bool, RangeError> {
        self.mask_bit(K::LAYOUT.trigger, step)
    }

    pub fn is_trigless(&self, step: u8) -> Result<bool, RangeError> {
        self.mask_bit(K::LAYOUT.trigless, step)
    }

    /// Per-track length in steps.
    pub fn length(&self) -> u8 {
        self.byte(K::LAYOUT.length)
    }

    pub fn scale(&self) -> Result<ScaleMultiplier, RangeError> {
        ScaleMultiplier::from_code(self.byte(K::LAYOUT.scale))
    }

    /// Swing amount, 0-30.
    pub fn swing_amount(&self) -> u8 {
        self.byte(K::LAYOUT.swing_amount)
    }

    pub fn start_silent(&self) -> u8 {
        self.byte(K::LAYOUT.start_silent)
    }

    pub fn plays_free(&self) -> u8 {
        self.byte(K::LAYOUT.plays_free)
    }

    pub fn trig_mode(&self) -> u8 {
        self.byte(K::LAYOUT.trig_mode)
    }

    pub fn trig_quant(&self) -> u8 {
        self.byte(K::LAYOUT.trig_quant)
    }

    pub fn oneshot_track(&self) -> u8 {
        self.byte(K::LAYOUT.oneshot_track)
    }

    fn plock_range(step: u8) -> Result<core::ops::Range<usize>, RangeError> {
        let start = K::LAYOUT.plocks + step_index(step)? * PLOCK_TABLE_SIZE;
        Ok(start..start + PLOCK_TABLE_SIZE)
    }

    fn condition_offset(step: u8) -> Result<usize, RangeError> {
        Ok(K::LAYOUT.conditions + step_index(step)? * CONDITION_SIZE)
    }

    /// Parameter locks of a step.
    pub fn plocks(&self, step: u8) -> Result<PlockTable<&[u8]>, RangeError> {
        let range = Self::plock_range(step)?;
        Ok(PlockTable::wrap(&self.as_bytes()[range]))
    }

    pub fn condition(&self, step: u8) -> Result<TrigCondition, RangeError> {
        let at = Self::condition_offset(step)?;
        let data = self.as_bytes();
        Ok(TrigCondition::from_bytes([data[at], data[at + 1]]))
    }

    pub fn step(&self, step: u8) -> Result<StepState, RangeError> {
        Ok(StepState {
            active: self.is_active(step)?,
            trigless: self.is_trigless(step)?,
            condition: self.condition(step)?,
            plocks: self.plocks(step)?.cloned(),
        })
    }

    /// An owned copy of this block.
    pub fn cloned(&self) -> TrackBlock<Vec<u8>, K> {
        TrackBlock { data: self.as_bytes().to_vec(), kind: PhantomData }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>, K: TrackKind> TrackBlock<B, K> {
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.data.as_mut()
    }

    fn set_mask(&mut self, offset: usize, steps: StepSet) {
        self.bytes_mut()[offset..offset + MASK_SIZE].copy_from_slice(&encode_mask(steps));
    }

    fn set_mask_bit(&mut self, offset: usize, step: u8, on: bool) -> Result<(), RangeError> {
        let (byte, bit) = mask_position(step)?;
        let slot = &mut self.bytes_mut()[offset + byte];
        if on {
            *slot |= 1 << bit;
        } else {
            *slot &= !(1 << bit);
        }
        Ok(())
    }

    /// Replace the trigger mask.
    pub fn set_trigs(&mut self, steps: StepSet) {
        self.set_mask(K::LAYOUT.trigger, steps);
    }

    pub fn set_trigless(&mut self, steps: StepSet) {
        self.set_mask(K::LAYOUT.trigless, steps);
    }

    pub fn set_plock_steps(&mut self, steps: StepSet) {
        self.set_mask(K::LAYOUT.plock_mask, steps);
    }

    pub fn set_swing_steps(&mut self, steps: StepSet) {
        self.set_mask(K::LAYOUT.swing_mask, steps);
    }

    pub fn set_trig(&mut self, step: u8, on: bool) -> Result<(), RangeError> {
        self.set_mask_bit(K::LAYOUT.trigger, step, on)
    }

    pub fn set_trigless_step(&mut self, step: u8, on: bool) -> Result<(), RangeError> {
        self.set_mask_bit(K::LAYOUT.trigless, step, on)
    }

    /// Per-track length, 1-64.
    pub fn set_length(&mut self, length: u8) -> Result<(), RangeError> {
        let length = RangeError::check_u8("track length", length, 1, STEP_COUNT)?;
        self.bytes_mut()[K::LAYOUT.length] = length;
        Ok(())
    }

    pub fn set_scale(&mut self, scale: ScaleMultiplier) {
        self.bytes_mut()[K::LAYOUT.scale] = scale.code();
    }

    pub fn set_swing_amount(&mut self, amount: u8) -> Result<(), RangeError> {
        let amount = RangeError::check_u8("swing amount", amount, 0, 30)?;
        self.bytes_mut()[K::LAYOUT.swing_amount] = amount;
        Ok(())
    }

    pub fn set_start_silent(&mut self, value: u8) {
        self.bytes_mut()[K::LAYOUT.start_silent] = value;
    }

    pub fn set_plays_free(&mut self, value: u8) {
        self.bytes_mut()[K::LAYOUT.plays_free] = value;
    }

    pub fn set_trig_mode(&mut self, value: u8) {
        self.bytes_mut()[K::LAYOUT.trig_mode] = value;
    }

    pub fn set_trig_quant(&mut self, value: u8) {
        self.bytes_mut()[K::LAYOUT.trig_quant] = value;
    }

    pub fn set_oneshot_track(&mut self, value: u8) {
        self.bytes_mut()[K::LAYOUT.oneshot_track] = value;
    }

    pub fn plocks_mut(&mut self, step: u8) -> Result<PlockTable<&mut [u8]>, RangeError> {
        let range = Self::plock_range(step)?;
        Ok(PlockTable::wrap(&mut self.bytes_mut()[range]))
    }

    /// Lock one slot of a step.
    pub fn set_plock(&mut self, step: u8, slot: PlockSlot, value: Option<u8>) -> Result<(), RangeError> {
        self.plocks_mut(step)?.set(slot, value);
        Ok(())
    }

    pub fn set_condition(&mut self, step: u8, condition: TrigCondition) -> Result<(), RangeError> {
        let at = Self::condition_offset(step)?;
        self.bytes_mut()[at..at + CONDITION_SIZE].copy_from_slice(&condition.to_bytes());
        Ok(())
    }

    /// Store a full step snapshot.
    pub fn set_step(&mut self, step: u8, state: &StepState) -> Result<(), RangeError> {
        self.set_trig(step, state.active)?;
        self.set_trigless_step(step, state.trigless)?;
        self.set_condition(step, state.condition)?;
        self.plocks_mut(step)?.copy_from(&state.plocks);
        Ok(())
    }

    /// Remove trigs, locks and condition from a step.
    pub fn clear_step(&mut self, step: u8) -> Result<(), RangeError> {
        self.set_step(step, &StepState::default())
    }

    /// Copy another block's contents, keeping this block's track id.
    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &TrackBlock<C, K>) {
        let id = self.track_id();
        self.bytes_mut().copy_from_slice(other.as_bytes());
        self.bytes_mut()[TRACK_ID] = id;
    }
}

impl<B: AsRef<[u8]>> AudioTrack<B> {
    pub fn oneshot_steps(&self) -> StepSet {
        self.mask(AUDIO_ONESHOT_MASK)
    }

    pub fn slide_steps(&self) -> StepSet {
        self.mask(AUDIO_SLIDE_MASK)
    }

    /// The four recorder trig masks.
    pub fn recorder_steps(&self, mask: usize) -> Result<StepSet, RangeError> {
        RangeError::check("recorder mask", mask, 1, 4)?;
        Ok(self.mask(AUDIO_RECORDER_MASKS + (mask - 1) * MASK_SIZE))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> AudioTrack<B> {
    pub fn set_oneshot_steps(&mut self, steps: StepSet) {
        self.set_mask(AUDIO_ONESHOT_MASK, steps);
    }

    pub fn set_slide_steps(&mut self, steps: StepSet) {
        self.set_mask(AUDIO_SLIDE_MASK, steps);
    }

    pub fn set_recorder_steps(&mut self, mask: usize, steps: StepSet) -> Result<(), RangeError> {
        RangeError::check("recorder mask", mask, 1, 4)?;
        self.set_mask(AUDIO_RECORDER_MASKS + (mask - 1) * MASK_SIZE, steps);
        Ok(())
    }
}

impl<B: AsRef<[u8]>> MidiTrack<B> {
    /// Lock of a named MIDI parameter on a step.
    pub fn midi_lock(&self, step: u8, param: MidiParam) -> Result<Option<u8>, RangeError> {
        self.plocks(step)?.get_index(param.index())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> MidiTrack<B> {
    pub fn set_midi_lock(&mut self, step: u8, param: MidiParam, value: Option<u8>) -> Result<(), RangeError> {
        self.plocks_mut(step)?.set_index(param.index(), value)
    }
}

impl<B: AsRef<[u8]>, C: AsRef<[u8]>, K> PartialEq<TrackBlock<C, K>> for TrackBlock<B, K> {
    fn eq(&self, other: &TrackBlock<C, K>) -> bool {
        self.data.as_ref() == other.data.as_ref()
    }
}
