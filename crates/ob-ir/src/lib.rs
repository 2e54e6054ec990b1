//! Core value types for octabank.
//!
//! These types describe the contents of a bank file without owning any of
//! its bytes: step sets, trig conditions, parameter-lock addressing, machine
//! and effect parameters. The byte-level codec in `ob-formats` reads and
//! writes them.

#[macro_use]
mod params;

mod condition;
mod fx;
mod machine;
mod midi;
mod plock;
mod range;
mod recorder;
mod scale;
mod steps;

pub use condition::{Condition, TrigCondition, MAX_CONDITION_CODE, PROBABILITY_LADDER};
pub use fx::{
    CombFilterParams, CompressorParams, DarkReverbParams, DelayParams, DjEqParams, EqParams,
    FilterParams, FxParams, FxSlot, FxType, LofiParams, ModulationParams, PhaserParams,
    PlateReverbParams, SpatializerParams, SpringReverbParams,
};
pub use machine::{
    MachineParams, MachineType, PickupParams, SampleParams, SampleSetup, SampleSlot, ThruParams,
};
pub use midi::MidiParam;
pub use params::{AmpParams, LfoParams};
pub use plock::{PlockPage, PlockSlot, PLOCK_DISABLED, PLOCK_MAX, PLOCK_SLOTS};
pub use range::RangeError;
pub use recorder::{QRecMode, RecTrigMode, RecordingLength, RecordingSource, QUANTIZE_STEPS};
pub use scale::ScaleMultiplier;
pub use steps::{StepSet, STEP_COUNT};
