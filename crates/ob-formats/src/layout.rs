//! Byte offsets and block sizes of the bank file.
//!
//! Offsets inside a block are relative to the block start.

// ---------------------------------------------------------------------------
// Bank
// ---------------------------------------------------------------------------

pub const BANK_SIZE: usize = 636_113;
pub const BANK_HEADER: &[u8; 21] = b"FORM\0\0\0\0DPS1BANK\0\0\0\0\0";
pub const BANK_VERSION: u8 = 23;
pub const VERSION_OFFSET: usize = 21;
pub const PATTERNS_OFFSET: usize = 22;
pub const PATTERN_COUNT: usize = 16;
pub const PARTS_OFFSET: usize = 0x8EED6;
/// Unsaved parts 1-4 followed by saved parts 1-4.
pub const PART_SLOTS: usize = 8;
pub const PART_COUNT: usize = 4;
pub const FLEX_COUNTER_OFFSET: usize = 0x9B4B2;
pub const PART_NAMES_OFFSET: usize = FLEX_COUNTER_OFFSET + 1;
pub const PART_NAME_LEN: usize = 7;
pub const CHECKSUM_OFFSET: usize = 0x9B4CF;
/// First byte covered by the checksum.
pub const CHECKSUM_START: usize = 16;

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

pub const PATTERN_SIZE: usize = 0x8EEC;
pub const PATTERN_HEADER: &[u8; 8] = b"PTRN\0\0\0\0";
pub const TRACK_COUNT: usize = 8;
pub const PATTERN_AUDIO_TRACKS: usize = 8;
pub const PATTERN_MIDI_TRACKS: usize = PATTERN_AUDIO_TRACKS + TRACK_COUNT * AUDIO_TRACK_SIZE;
pub const PATTERN_LENGTH: usize = 36_577;
pub const PATTERN_SCALE: usize = 36_578;
pub const PATTERN_PART: usize = 36_581;

// ---------------------------------------------------------------------------
// Pattern tracks
// ---------------------------------------------------------------------------

pub const MASK_SIZE: usize = 8;
pub const STEPS: usize = 64;
pub const CONDITION_SIZE: usize = 2;

pub const AUDIO_TRACK_SIZE: usize = 0x922;
pub const AUDIO_TRACK_TAG: &[u8; 4] = b"TRAC";
pub const MIDI_TRACK_SIZE: usize = 2233;
pub const MIDI_TRACK_TAG: &[u8; 4] = b"MTRA";
pub const TRACK_ID: usize = 8;

/// Field offsets shared by the two pattern track kinds.
#[derive(Clone, Copy, Debug)]
pub struct TrackLayout {
    pub size: usize,
    pub tag: &'static [u8; 4],
    pub trigger: usize,
    pub trigless: usize,
    pub plock_mask: usize,
    pub swing_mask: usize,
    pub length: usize,
    pub scale: usize,
    pub swing_amount: usize,
    pub start_silent: usize,
    pub plays_free: usize,
    pub trig_mode: usize,
    pub trig_quant: usize,
    pub oneshot_track: usize,
    pub plocks: usize,
    pub conditions: usize,
}

pub const AUDIO_TRACK: TrackLayout = TrackLayout {
    size: AUDIO_TRACK_SIZE,
    tag: AUDIO_TRACK_TAG,
    trigger: 9,
    trigless: 17,
    plock_mask: 25,
    swing_mask: 73,
    length: 89,
    scale: 90,
    swing_amount: 91,
    start_silent: 92,
    plays_free: 93,
    trig_mode: 94,
    trig_quant: 95,
    oneshot_track: 96,
    plocks: 98,
    conditions: 2210,
};

pub const MIDI_TRACK: TrackLayout = TrackLayout {
    size: MIDI_TRACK_SIZE,
    tag: MIDI_TRACK_TAG,
    trigger: 9,
    trigless: 17,
    plock_mask: 25,
    swing_mask: 33,
    length: 49,
    scale: 50,
    swing_amount: 51,
    start_silent: 52,
    plays_free: 53,
    trig_mode: 54,
    trig_quant: 55,
    oneshot_track: 56,
    plocks: 57,
    conditions: 2105,
};

/// Audio-only step masks.
pub const AUDIO_ONESHOT_MASK: usize = 33;
pub const AUDIO_RECORDER_MASKS: usize = 41;
pub const AUDIO_SLIDE_MASK: usize = 81;

// ---------------------------------------------------------------------------
// Part
// ---------------------------------------------------------------------------

pub const PART_SIZE: usize = 6331;
pub const PART_TAG: &[u8; 4] = b"PART";
pub const PART_ID: usize = 8;
pub const PART_FX1_TYPES: usize = 9;
pub const PART_FX2_TYPES: usize = 17;
pub const PART_SCENE_A: usize = 25;
pub const PART_SCENE_B: usize = 26;
/// (main, cue) pairs
pub const PART_VOLUMES: usize = 27;
pub const PART_MACHINE_TYPES: usize = 43;
pub const PART_MACHINE_VALUES: usize = 51;
pub const PART_TRACK_PARAMS: usize = 291;
pub const PART_MACHINE_SETUP: usize = 483;
pub const PART_SLOTS_STRUCT: usize = 723;
pub const PART_AUDIO_SETUP: usize = 763;
pub const PART_MIDI_VALUES: usize = 1051;
pub const PART_MIDI_SETUP: usize = 1307;
pub const PART_RECORDERS: usize = 1595;
pub const PART_SCENES: usize = 1691;

pub const MACHINE_BLOCK_SIZE: usize = 30;
pub const TRACK_PARAMS_SIZE: usize = 24;
pub const SLOT_STRUCT_SIZE: usize = 5;
pub const AUDIO_SETUP_SIZE: usize = 36;
pub const MIDI_VALUES_SIZE: usize = 32;
pub const MIDI_SETUP_SIZE: usize = 36;
pub const RECORDER_SIZE: usize = 12;

pub const SCENE_COUNT: usize = 16;
pub const SCENE_SIZE: usize = TRACK_COUNT * PLOCK_TABLE_SIZE;
pub const PLOCK_TABLE_SIZE: usize = 32;

/// Slot struct fields.
pub const SLOT_STATIC: usize = 0;
pub const SLOT_FLEX: usize = 1;
pub const SLOT_RECORDER: usize = 4;

/// Recorder setup fields.
pub const REC_IN_AB: usize = 0;
pub const REC_IN_CD: usize = 1;
pub const REC_LENGTH: usize = 2;
pub const REC_TRIG: usize = 3;
pub const REC_SRC3: usize = 4;
pub const REC_LOOP: usize = 5;
pub const REC_FADE_IN: usize = 6;
pub const REC_FADE_OUT: usize = 7;
pub const REC_AB_GAIN: usize = 8;
pub const REC_QREC: usize = 9;
pub const REC_QPL: usize = 10;
pub const REC_CD_GAIN: usize = 11;

/// MIDI setup fields.
pub const MIDI_CHANNEL: usize = 0;
pub const MIDI_BANK: usize = 1;
pub const MIDI_PROGRAM: usize = 2;
pub const MIDI_SUB_BANK: usize = 4;
pub const MIDI_LFO_DESTINATIONS: usize = 6;
pub const MIDI_LFO_WAVES: usize = 9;
pub const MIDI_ARP_LENGTH: usize = 14;
pub const MIDI_ARP_KEY: usize = 17;
pub const MIDI_CC_NUMBERS: usize = 20;
pub const MIDI_LFO_MULTIPLIERS: usize = 30;
pub const MIDI_LFO_TRIGGERS: usize = 33;
/// Bank, program and sub-bank value meaning "don't send".
pub const MIDI_OFF: u8 = 128;

/// Per-track regions of a part as `(base, stride)`. Copying a part track
/// copies each region's stride-sized chunk at `base + index * stride`.
pub const AUDIO_PART_TRACK_REGIONS: [(usize, usize); 10] = [
    (PART_FX1_TYPES, 1),
    (PART_FX2_TYPES, 1),
    (PART_VOLUMES, 2),
    (PART_MACHINE_TYPES, 1),
    (PART_MACHINE_VALUES, MACHINE_BLOCK_SIZE),
    (PART_TRACK_PARAMS, TRACK_PARAMS_SIZE),
    (PART_MACHINE_SETUP, MACHINE_BLOCK_SIZE),
    (PART_SLOTS_STRUCT, SLOT_STRUCT_SIZE),
    (PART_AUDIO_SETUP, AUDIO_SETUP_SIZE),
    (PART_RECORDERS, RECORDER_SIZE),
];

pub const MIDI_PART_TRACK_REGIONS: [(usize, usize); 2] = [
    (PART_MIDI_VALUES, MIDI_VALUES_SIZE),
    (PART_MIDI_SETUP, MIDI_SETUP_SIZE),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_tile_the_bank() {
        assert_eq!(PATTERNS_OFFSET + PATTERN_COUNT * PATTERN_SIZE, PARTS_OFFSET);
        assert_eq!(PARTS_OFFSET + PART_SLOTS * PART_SIZE + 4, FLEX_COUNTER_OFFSET);
        assert_eq!(PART_NAMES_OFFSET + PART_COUNT * PART_NAME_LEN, CHECKSUM_OFFSET);
        assert_eq!(CHECKSUM_OFFSET + 2, BANK_SIZE);
    }

    #[test]
    fn tracks_tile_the_pattern() {
        assert_eq!(PATTERN_MIDI_TRACKS, 18_712);
        assert_eq!(PATTERN_MIDI_TRACKS + TRACK_COUNT * MIDI_TRACK_SIZE, 36_576);
        assert!(PATTERN_PART < PATTERN_SIZE);
        assert_eq!(AUDIO_TRACK.plocks + STEPS * PLOCK_TABLE_SIZE + 64, AUDIO_TRACK.conditions);
        assert_eq!(AUDIO_TRACK.conditions + STEPS * CONDITION_SIZE, AUDIO_TRACK_SIZE);
        assert_eq!(MIDI_TRACK.plocks + STEPS * PLOCK_TABLE_SIZE, MIDI_TRACK.conditions);
        assert_eq!(MIDI_TRACK.conditions + STEPS * CONDITION_SIZE, MIDI_TRACK_SIZE);
    }

    #[test]
    fn part_regions_are_contiguous() {
        assert_eq!(PART_MACHINE_VALUES + TRACK_COUNT * MACHINE_BLOCK_SIZE, PART_TRACK_PARAMS);
        assert_eq!(PART_TRACK_PARAMS + TRACK_COUNT * TRACK_PARAMS_SIZE, PART_MACHINE_SETUP);
        assert_eq!(PART_MACHINE_SETUP + TRACK_COUNT * MACHINE_BLOCK_SIZE, PART_SLOTS_STRUCT);
        assert_eq!(PART_SLOTS_STRUCT + TRACK_COUNT * SLOT_STRUCT_SIZE, PART_AUDIO_SETUP);
        assert_eq!(PART_AUDIO_SETUP + TRACK_COUNT * AUDIO_SETUP_SIZE, PART_MIDI_VALUES);
        assert_eq!(PART_MIDI_VALUES + TRACK_COUNT * MIDI_VALUES_SIZE, PART_MIDI_SETUP);
        assert_eq!(PART_MIDI_SETUP + TRACK_COUNT * MIDI_SETUP_SIZE, PART_RECORDERS);
        assert_eq!(PART_RECORDERS + TRACK_COUNT * RECORDER_SIZE, PART_SCENES);
        assert!(PART_SCENES + SCENE_COUNT * SCENE_SIZE <= PART_SIZE);
    }
}
