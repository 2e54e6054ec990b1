//! Audio track machines and their source parameters.

use serde::Serialize;

use crate::range::RangeError;

/// Source machine of an audio track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MachineType {
    #[default]
    Static = 0,
    Flex = 1,
    Thru = 2,
    Neighbor = 3,
    Pickup = 4,
}

impl MachineType {
    pub const ALL: [MachineType; 5] = [
        MachineType::Static,
        MachineType::Flex,
        MachineType::Thru,
        MachineType::Neighbor,
        MachineType::Pickup,
    ];

    pub fn from_code(code: u8) -> Result<Self, RangeError> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| RangeError::new("machine type", code as i64, 0, 4))
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Offset of this machine's six-byte window inside a part's 30-byte
    /// machine parameter blocks.
    pub const fn window_offset(self) -> usize {
        self as usize * 6
    }

    /// Static and Flex play samples from slots.
    pub const fn is_sampler(self) -> bool {
        matches!(self, MachineType::Static | MachineType::Flex)
    }

    pub fn name(self) -> &'static str {
        match self {
            MachineType::Static => "Static",
            MachineType::Flex => "Flex",
            MachineType::Thru => "Thru",
            MachineType::Neighbor => "Neighbor",
            MachineType::Pickup => "Pickup",
        }
    }
}

param_window!(
    /// Playback page of the Static and Flex machines.
    SampleParams {
        /// 64 = no transposition
        pitch: 0,
        start: 1,
        length: 2,
        rate: 3,
        retrig: 4,
        retrig_time: 5,
    }
);

param_window!(
    /// Thru machine input routing.
    ThruParams {
        in_ab: 0,
        vol_ab: 1,
        in_cd: 3,
        vol_cd: 4,
    }
);

param_window!(
    /// Pickup looper controls.
    PickupParams {
        pitch: 0,
        direction: 1,
        length: 2,
        gain: 4,
        operation: 5,
    }
);

param_window!(
    /// Setup page of the Static and Flex machines.
    SampleSetup {
        loop_mode: 0,
        slice: 1,
        length_mode: 2,
        rate_mode: 3,
        timestretch: 4,
        timestretch_sensitivity: 5,
    }
);

/// Source parameters tagged by machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "machine", rename_all = "snake_case")]
pub enum MachineParams<T> {
    Static(SampleParams<T>),
    Flex(SampleParams<T>),
    Thru(ThruParams<T>),
    Neighbor,
    Pickup(PickupParams<T>),
}

impl<T: Copy> MachineParams<T> {
    /// Interpret a source window for `machine`.
    pub fn from_window(machine: MachineType, window: &[T; 6]) -> Self {
        match machine {
            MachineType::Static => MachineParams::Static(SampleParams::from_window(window)),
            MachineType::Flex => MachineParams::Flex(SampleParams::from_window(window)),
            MachineType::Thru => MachineParams::Thru(ThruParams::from_window(window)),
            MachineType::Neighbor => MachineParams::Neighbor,
            MachineType::Pickup => MachineParams::Pickup(PickupParams::from_window(window)),
        }
    }

    /// Write the variant's named fields into a source window.
    pub fn write_window(&self, window: &mut [T; 6]) {
        match self {
            MachineParams::Static(p) | MachineParams::Flex(p) => p.write_window(window),
            MachineParams::Thru(p) => p.write_window(window),
            MachineParams::Neighbor => {}
            MachineParams::Pickup(p) => p.write_window(window),
        }
    }

    pub fn machine_type(&self) -> MachineType {
        match self {
            MachineParams::Static(_) => MachineType::Static,
            MachineParams::Flex(_) => MachineType::Flex,
            MachineParams::Thru(_) => MachineType::Thru,
            MachineParams::Neighbor => MachineType::Neighbor,
            MachineParams::Pickup(_) => MachineType::Pickup,
        }
    }
}

/// Sample reference held by a Flex slot binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleSlot {
    /// User sample slot, 0-127
    Sample(u8),
    /// Recorder buffer, 1-8 (stored as 128-135)
    Recorder(u8),
}

impl SampleSlot {
    pub fn from_code(code: u8) -> Result<Self, RangeError> {
        match code {
            0..=127 => Ok(SampleSlot::Sample(code)),
            128..=135 => Ok(SampleSlot::Recorder(code - 127)),
            _ => Err(RangeError::new("sample slot", code as i64, 0, 135)),
        }
    }

    pub fn to_code(self) -> Result<u8, RangeError> {
        match self {
            SampleSlot::Sample(n) => RangeError::check_u8("sample slot", n, 0, 127),
            SampleSlot::Recorder(n) => Ok(RangeError::check_u8("recorder buffer", n, 1, 8)? + 127),
        }
    }
}
