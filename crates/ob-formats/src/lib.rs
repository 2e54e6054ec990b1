//! Byte-level codec for octabank bank files.
//!
//! A [`Bank`] wraps one 636113-byte buffer. Patterns, parts, scenes, tracks
//! and parameter-lock tables are views into that buffer, so every edit lands
//! in place and [`Bank::serialize`] only has to refresh the checksum.

pub mod bytes;
pub mod layout;

mod bank;
mod checksum;
mod midi_part_track;
mod part;
mod part_track;
mod pattern;
mod plock;
mod recorder;
mod scene;
mod summary;
mod template;
mod track;
mod trig_mask;

pub use bank::{validate, Bank, BankHeader, BankOptions, ChecksumPolicy, PartState};
pub use checksum::{byte_sum, Baseline};
pub use midi_part_track::{MidiLfoSetup, MidiPartTrack};
pub use ob_ir::RangeError;
pub use part::Part;
pub use part_track::AudioPartTrack;
pub use pattern::Pattern;
pub use plock::PlockTable;
pub use recorder::Recorder;
pub use scene::Scene;
pub use summary::{
    AudioPartTrackSummary, BankSummary, ChecksumSummary, MidiPartTrackSummary, PartSummary, PatternSummary,
    RecorderSummary, SceneSummary, StepSummary, TrackSummary,
};
pub use track::{Audio, AudioTrack, Midi, MidiTrack, StepState, TrackBlock, TrackKind};
pub use trig_mask::{decode_mask, encode_mask, encode_steps, mask_position};

use thiserror::Error;

/// The buffer is not a bank this codec can read.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Header tag does not match
    #[error("not a bank file")]
    InvalidHeader,
    #[error("unsupported bank format version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },
    #[error("wrong buffer length {found} (expected {expected})")]
    WrongLength { expected: usize, found: usize },
    #[error("unexpected end of buffer at offset {offset}")]
    UnexpectedEof { offset: usize },
}

/// Stored data disagrees with data derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch { stored: u16, computed: u16 },
}

/// Any failure of a bank operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BankError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}
