//! Serializable snapshots of bank contents.
//!
//! Snapshots copy decoded values out of the buffer, so they outlive the bank
//! they were taken from. Numbers are 1-based, as in the view accessors.
//! Building one fails with a [`RangeError`] when a stored enum code does not
//! decode.

use std::collections::BTreeMap;

use ob_ir::{
    AmpParams, FxParams, FxSlot, LfoParams, MachineParams, QRecMode, RangeError, RecTrigMode,
    RecordingLength, RecordingSource, SampleSlot, ScaleMultiplier, StepSet,
};
use serde::Serialize;

use crate::bank::{Bank, PartState};
use crate::layout::{PART_COUNT, PLOCK_TABLE_SIZE, SCENE_COUNT, TRACK_COUNT};
use crate::midi_part_track::{MidiLfoSetup, MidiPartTrack};
use crate::part::Part;
use crate::part_track::AudioPartTrack;
use crate::pattern::Pattern;
use crate::plock::PlockTable;
use crate::recorder::Recorder;
use crate::scene::Scene;
use crate::track::{StepState, TrackBlock, TrackKind};

const MIDI_CC_COUNT: usize = 10;
const MIDI_LFO_COUNT: usize = 3;

/// One step and its number.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepSummary {
    pub step: u8,
    #[serde(flatten)]
    pub state: StepState,
}

/// Sequence settings of one audio or MIDI track in a pattern.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackSummary {
    pub track: u8,
    pub active_steps: StepSet,
    pub trigless_steps: StepSet,
    pub length: u8,
    pub scale: ScaleMultiplier,
    pub swing_amount: u8,
    /// Steps holding a trig or a trigless trig
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepSummary>>,
}

impl TrackSummary {
    pub fn new<B: AsRef<[u8]>, K: TrackKind>(
        track: &TrackBlock<B, K>,
        include_steps: bool,
    ) -> Result<Self, RangeError> {
        let steps = if include_steps {
            let used = StepSet::from_bits(track.trigs().bits() | track.trigless().bits());
            let steps = used
                .iter()
                .map(|step| Ok(StepSummary { step, state: track.step(step)? }))
                .collect::<Result<Vec<_>, RangeError>>()?;
            Some(steps)
        } else {
            None
        };
        Ok(Self {
            track: track.track_id() + 1,
            active_steps: track.trigs(),
            trigless_steps: track.trigless(),
            length: track.length(),
            scale: track.scale()?,
            swing_amount: track.swing_amount(),
            steps,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatternSummary {
    pub pattern: usize,
    pub part: usize,
    pub length: u8,
    pub scale: ScaleMultiplier,
    pub audio_tracks: Vec<TrackSummary>,
    pub midi_tracks: Vec<TrackSummary>,
}

impl PatternSummary {
    pub fn new<B: AsRef<[u8]>>(number: usize, pattern: &Pattern<B>, include_steps: bool) -> Result<Self, RangeError> {
        Ok(Self {
            pattern: number,
            part: pattern.part()?,
            length: pattern.length(),
            scale: pattern.scale()?,
            audio_tracks: pattern
                .audio_tracks()
                .map(|t| TrackSummary::new(&t, include_steps))
                .collect::<Result<_, _>>()?,
            midi_tracks: pattern
                .midi_tracks()
                .map(|t| TrackSummary::new(&t, include_steps))
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RecorderSummary {
    pub source: RecordingSource,
    pub length: RecordingLength,
    pub trig_mode: RecTrigMode,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub fade_in: u8,
    pub fade_out: u8,
    pub ab_gain: u8,
    pub cd_gain: u8,
    pub qrec: QRecMode,
    pub qpl: QRecMode,
}

impl RecorderSummary {
    pub fn new<B: AsRef<[u8]>>(recorder: &Recorder<B>) -> Result<Self, RangeError> {
        Ok(Self {
            source: recorder.source()?,
            length: recorder.length()?,
            trig_mode: recorder.trig_mode()?,
            looped: recorder.is_loop(),
            fade_in: recorder.fade_in(),
            fade_out: recorder.fade_out(),
            ab_gain: recorder.ab_gain(),
            cd_gain: recorder.cd_gain(),
            qrec: recorder.qrec()?,
            qpl: recorder.qpl()?,
        })
    }
}

/// Machine, effects and routing of one audio track in a part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AudioPartTrackSummary {
    pub track: usize,
    pub machine: MachineParams<u8>,
    pub fx1: FxParams<u8>,
    pub fx2: FxParams<u8>,
    pub lfo: LfoParams<u8>,
    pub amp: AmpParams<u8>,
    pub main_volume: u8,
    pub cue_volume: u8,
    pub static_slot: u8,
    pub flex_slot: SampleSlot,
    pub recorder_slot: u8,
    pub recorder: RecorderSummary,
}

impl AudioPartTrackSummary {
    pub fn new<B: AsRef<[u8]>>(track: &AudioPartTrack<B>) -> Result<Self, RangeError> {
        let (main_volume, cue_volume) = track.volume();
        Ok(Self {
            track: track.track(),
            machine: track.machine()?,
            fx1: track.fx(FxSlot::Fx1)?,
            fx2: track.fx(FxSlot::Fx2)?,
            lfo: track.lfo(),
            amp: track.amp(),
            main_volume,
            cue_volume,
            static_slot: track.static_slot(),
            flex_slot: track.flex_slot()?,
            recorder_slot: track.recorder_slot(),
            recorder: RecorderSummary::new(&track.recorder())?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MidiPartTrackSummary {
    pub track: usize,
    pub channel: u8,
    pub bank: Option<u8>,
    pub program: Option<u8>,
    pub sub_bank: Option<u8>,
    pub cc_numbers: Vec<u8>,
    pub arp_length: u8,
    pub arp_key: u8,
    pub lfos: Vec<MidiLfoSetup>,
}

impl MidiPartTrackSummary {
    pub fn new<B: AsRef<[u8]>>(track: &MidiPartTrack<B>) -> Result<Self, RangeError> {
        Ok(Self {
            track: track.track(),
            channel: track.channel(),
            bank: track.bank(),
            program: track.program(),
            sub_bank: track.sub_bank(),
            cc_numbers: (1..=MIDI_CC_COUNT).map(|cc| track.cc_number(cc)).collect::<Result<_, _>>()?,
            arp_length: track.arp_length(),
            arp_key: track.arp_key(),
            lfos: (1..=MIDI_LFO_COUNT).map(|n| track.lfo(n)).collect::<Result<_, _>>()?,
        })
    }
}

/// Locks of one scene, keyed by track number. Tracks without locks are left
/// out.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneSummary {
    pub scene: usize,
    pub tracks: BTreeMap<usize, PlockTable<[u8; PLOCK_TABLE_SIZE]>>,
}

impl SceneSummary {
    pub fn new<B: AsRef<[u8]>>(number: usize, scene: &Scene<B>) -> Self {
        let tracks = scene
            .tracks()
            .enumerate()
            .filter(|(_, locks)| !locks.is_empty())
            .map(|(i, locks)| (i + 1, locks.cloned()))
            .collect();
        Self { scene: number, tracks }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PartSummary {
    pub part: usize,
    pub name: String,
    pub active_scene_a: u8,
    pub active_scene_b: u8,
    pub audio_tracks: Vec<AudioPartTrackSummary>,
    pub midi_tracks: Vec<MidiPartTrackSummary>,
    /// Scenes holding at least one lock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenes: Option<Vec<SceneSummary>>,
}

impl PartSummary {
    pub fn new<B: AsRef<[u8]>>(
        number: usize,
        name: &str,
        part: &Part<B>,
        include_scenes: bool,
    ) -> Result<Self, RangeError> {
        let scenes = if include_scenes {
            let mut scenes = Vec::new();
            for n in 1..=SCENE_COUNT {
                let scene = part.scene(n)?;
                if !scene.is_empty() {
                    scenes.push(SceneSummary::new(n, &scene));
                }
            }
            Some(scenes)
        } else {
            None
        };
        Ok(Self {
            part: number,
            name: name.to_string(),
            active_scene_a: part.active_scene_a(),
            active_scene_b: part.active_scene_b(),
            audio_tracks: part.audio_tracks().map(|t| AudioPartTrackSummary::new(&t)).collect::<Result<_, _>>()?,
            midi_tracks: (1..=TRACK_COUNT)
                .map(|n| MidiPartTrackSummary::new(&part.midi_track(n)?))
                .collect::<Result<_, _>>()?,
            scenes,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChecksumSummary {
    pub stored: u16,
    pub computed: u16,
    pub valid: bool,
}

/// Whole-bank snapshot. Parts are the working (unsaved) copies.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BankSummary {
    pub version: u8,
    pub checksum: ChecksumSummary,
    pub flex_slot_count: u8,
    pub parts: Vec<PartSummary>,
    pub patterns: Vec<PatternSummary>,
}

impl BankSummary {
    pub fn new<B: AsRef<[u8]>>(bank: &Bank<B>, include_steps: bool, include_scenes: bool) -> Result<Self, RangeError> {
        let stored = bank.stored_checksum();
        let computed = bank.compute_checksum();
        let parts = (1..=PART_COUNT)
            .map(|n| {
                let name = bank.part_name(n)?;
                PartSummary::new(n, &name, &bank.part(n, PartState::Unsaved)?, include_scenes)
            })
            .collect::<Result<_, RangeError>>()?;
        let patterns = bank
            .patterns()
            .enumerate()
            .map(|(i, pattern)| PatternSummary::new(i + 1, &pattern, include_steps))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            version: bank.version(),
            checksum: ChecksumSummary { stored, computed, valid: stored == computed },
            flex_slot_count: bank.flex_slot_count(),
            parts,
            patterns,
        })
    }
}

impl<B: AsRef<[u8]>> Bank<B> {
    /// Snapshot of the bank for export.
    pub fn summary(&self, include_steps: bool, include_scenes: bool) -> Result<BankSummary, RangeError> {
        BankSummary::new(self, include_steps, include_scenes)
    }
}
