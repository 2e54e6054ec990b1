//! The generated default bank image.
//!
//! Fills every block the way a freshly initialized bank looks: tags and ids,
//! unset parameter locks, and the part defaults of a new project.

use ob_ir::{FxType, MachineType, PLOCK_DISABLED};

use crate::checksum::Baseline;
use crate::layout::*;

const SAMPLE_VALUES: [u8; 6] = [64, 0, 0, 127, 0, 79];
const THRU_VALUES: [u8; 6] = [0, 64, 0, 0, 64, 0];
const PICKUP_VALUES: [u8; 6] = [64, 2, 1, 0, 64, 1];
const SAMPLE_SETUP: [u8; 6] = [3, 0, 0, 0, 1, 64];
const LFO_VALUES: [u8; 6] = [32, 32, 32, 0, 0, 0];
const AMP_VALUES: [u8; 6] = [0, 127, 24, 108, 64, 0];
const VOLUME: u8 = 108;
const SCENE_B: u8 = 8;
const SWING_MASK: u8 = 0xAA;
const DEFAULT_LENGTH: u8 = 16;
const DEFAULT_SCALE: u8 = 2;

const MIDI_VALUES: [u8; MIDI_VALUES_SIZE] = [
    48, 100, 6, 64, 64, 64, // note page
    32, 32, 32, 0, 0, 0, // lfo
    64, 0, 0, 12, 0, 6, // arp
    64, 0, // pitch bend, aftertouch
    127, 0, 0, 64, 0, 0, 0, 0, 0, 0, // cc values
    0, 0,
];
const MIDI_CC_DEFAULTS: [u8; 10] = [7, 1, 2, 10, 71, 72, 73, 74, 75, 76];
const MIDI_ARP_DEFAULT_LENGTH: u8 = 16;

const RECORDER_VALUES: [u8; RECORDER_SIZE] = [0, 0, 15, 0, 0, 0, 0, 0, 64, 0, 255, 64];

const PART_NAMES: [&[u8]; PART_COUNT] = [b"ONE", b"TWO", b"THREE", b"FOUR"];

pub(crate) fn init_track(layout: &TrackLayout, buf: &mut [u8], id: u8) {
    buf.fill(0);
    buf[..4].copy_from_slice(layout.tag);
    buf[TRACK_ID] = id;
    buf[layout.swing_mask..layout.swing_mask + MASK_SIZE].fill(SWING_MASK);
    buf[layout.length] = DEFAULT_LENGTH;
    buf[layout.scale] = DEFAULT_SCALE;
    buf[layout.start_silent] = 255;
    buf[layout.plocks..layout.plocks + STEPS * PLOCK_TABLE_SIZE].fill(PLOCK_DISABLED);
}

pub(crate) fn init_pattern(buf: &mut [u8]) {
    buf.fill(0);
    buf[..PATTERN_HEADER.len()].copy_from_slice(PATTERN_HEADER);
    for (id, track) in buf[PATTERN_AUDIO_TRACKS..PATTERN_MIDI_TRACKS]
        .chunks_exact_mut(AUDIO_TRACK_SIZE)
        .enumerate()
    {
        init_track(&AUDIO_TRACK, track, id as u8);
    }
    let midi_end = PATTERN_MIDI_TRACKS + TRACK_COUNT * MIDI_TRACK_SIZE;
    for (id, track) in buf[PATTERN_MIDI_TRACKS..midi_end]
        .chunks_exact_mut(MIDI_TRACK_SIZE)
        .enumerate()
    {
        init_track(&MIDI_TRACK, track, id as u8);
    }
    buf[PATTERN_LENGTH] = DEFAULT_LENGTH;
    buf[PATTERN_SCALE] = DEFAULT_SCALE;
    buf[PATTERN_PART] = 0;
}

fn machine_values(buf: &mut [u8]) {
    for (machine, values) in [
        (MachineType::Static, SAMPLE_VALUES),
        (MachineType::Flex, SAMPLE_VALUES),
        (MachineType::Thru, THRU_VALUES),
        (MachineType::Pickup, PICKUP_VALUES),
    ] {
        let at = machine.window_offset();
        buf[at..at + 6].copy_from_slice(&values);
    }
}

pub(crate) fn init_recorder(buf: &mut [u8]) {
    buf.copy_from_slice(&RECORDER_VALUES);
}

pub(crate) fn init_part(buf: &mut [u8], id: u8) {
    buf.fill(0);
    buf[..4].copy_from_slice(PART_TAG);
    buf[PART_ID] = id;
    buf[PART_SCENE_A] = 0;
    buf[PART_SCENE_B] = SCENE_B;

    for i in 0..TRACK_COUNT {
        buf[PART_FX1_TYPES + i] = FxType::Filter.code();
        buf[PART_FX2_TYPES + i] = FxType::Delay.code();
        buf[PART_VOLUMES + 2 * i] = VOLUME;
        buf[PART_VOLUMES + 2 * i + 1] = VOLUME;
        buf[PART_MACHINE_TYPES + i] = MachineType::Static.code();

        let values = PART_MACHINE_VALUES + i * MACHINE_BLOCK_SIZE;
        machine_values(&mut buf[values..values + MACHINE_BLOCK_SIZE]);

        let params = PART_TRACK_PARAMS + i * TRACK_PARAMS_SIZE;
        buf[params..params + 6].copy_from_slice(&LFO_VALUES);
        buf[params + 6..params + 12].copy_from_slice(&AMP_VALUES);
        let mut fx1 = [0u8; 6];
        FxType::Filter.apply_defaults(&mut fx1);
        buf[params + 12..params + 18].copy_from_slice(&fx1);
        let mut fx2 = [0u8; 6];
        FxType::Delay.apply_defaults(&mut fx2);
        buf[params + 18..params + 24].copy_from_slice(&fx2);

        let setup = PART_MACHINE_SETUP + i * MACHINE_BLOCK_SIZE;
        for machine in [MachineType::Static, MachineType::Flex] {
            let at = setup + machine.window_offset();
            buf[at..at + 6].copy_from_slice(&SAMPLE_SETUP);
        }

        let slots = PART_SLOTS_STRUCT + i * SLOT_STRUCT_SIZE;
        buf[slots + SLOT_STATIC] = i as u8;
        buf[slots + SLOT_FLEX] = i as u8;
        buf[slots + SLOT_RECORDER] = i as u8;

        let midi = PART_MIDI_VALUES + i * MIDI_VALUES_SIZE;
        buf[midi..midi + MIDI_VALUES_SIZE].copy_from_slice(&MIDI_VALUES);

        let setup = PART_MIDI_SETUP + i * MIDI_SETUP_SIZE;
        buf[setup + MIDI_CHANNEL] = i as u8;
        buf[setup + MIDI_BANK] = MIDI_OFF;
        buf[setup + MIDI_PROGRAM] = MIDI_OFF;
        buf[setup + MIDI_SUB_BANK] = MIDI_OFF;
        buf[setup + MIDI_ARP_LENGTH] = MIDI_ARP_DEFAULT_LENGTH;
        buf[setup + MIDI_CC_NUMBERS..setup + MIDI_CC_NUMBERS + 10].copy_from_slice(&MIDI_CC_DEFAULTS);

        let rec = PART_RECORDERS + i * RECORDER_SIZE;
        init_recorder(&mut buf[rec..rec + RECORDER_SIZE]);
    }

    buf[PART_SCENES..PART_SCENES + SCENE_COUNT * SCENE_SIZE].fill(PLOCK_DISABLED);
}

/// Build the default bank image with a valid checksum.
pub(crate) fn default_bank() -> Vec<u8> {
    let mut buf = vec![0u8; BANK_SIZE];
    buf[..BANK_HEADER.len()].copy_from_slice(BANK_HEADER);
    buf[VERSION_OFFSET] = BANK_VERSION;

    let patterns_end = PATTERNS_OFFSET + PATTERN_COUNT * PATTERN_SIZE;
    for pattern in buf[PATTERNS_OFFSET..patterns_end].chunks_exact_mut(PATTERN_SIZE) {
        init_pattern(pattern);
    }
    let parts_end = PARTS_OFFSET + PART_SLOTS * PART_SIZE;
    for (slot, part) in buf[PARTS_OFFSET..parts_end].chunks_exact_mut(PART_SIZE).enumerate() {
        init_part(part, (slot % PART_COUNT) as u8);
    }

    for (i, name) in PART_NAMES.iter().enumerate() {
        let at = PART_NAMES_OFFSET + i * PART_NAME_LEN;
        buf[at..at + name.len()].copy_from_slice(name);
    }

    let checksum = Baseline::default().checksum(&buf);
    buf[CHECKSUM_OFFSET..].copy_from_slice(&checksum.to_be_bytes());
    buf
}
