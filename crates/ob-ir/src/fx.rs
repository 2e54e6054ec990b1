//! Track effects: types, slots, named parameters and defaults.

use serde::Serialize;

use crate::range::RangeError;

/// One of a track's two effect slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FxSlot {
    Fx1,
    Fx2,
}

impl FxSlot {
    pub const fn index(self) -> usize {
        match self {
            FxSlot::Fx1 => 0,
            FxSlot::Fx2 => 1,
        }
    }
}

/// Effect type codes as stored in a part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FxType {
    #[default]
    Off = 0,
    Filter = 4,
    Spatializer = 5,
    Delay = 8,
    Eq = 12,
    DjEq = 13,
    Phaser = 16,
    Flanger = 17,
    Chorus = 18,
    CombFilter = 19,
    PlateReverb = 20,
    SpringReverb = 21,
    DarkReverb = 22,
    Compressor = 24,
    Lofi = 25,
}

impl FxType {
    pub const ALL: [FxType; 15] = [
        FxType::Off,
        FxType::Filter,
        FxType::Spatializer,
        FxType::Delay,
        FxType::Eq,
        FxType::DjEq,
        FxType::Phaser,
        FxType::Flanger,
        FxType::Chorus,
        FxType::CombFilter,
        FxType::PlateReverb,
        FxType::SpringReverb,
        FxType::DarkReverb,
        FxType::Compressor,
        FxType::Lofi,
    ];

    pub fn from_code(code: u8) -> Result<Self, RangeError> {
        Self::ALL
            .iter()
            .copied()
            .find(|fx| fx.code() == code)
            .ok_or_else(|| RangeError::new("fx type", code as i64, 0, 25))
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Delay and the reverbs only run in the second slot.
    pub const fn allowed_in(self, slot: FxSlot) -> bool {
        match slot {
            FxSlot::Fx2 => true,
            FxSlot::Fx1 => !matches!(
                self,
                FxType::Delay | FxType::PlateReverb | FxType::SpringReverb | FxType::DarkReverb
            ),
        }
    }

    /// Fail unless this type may occupy `slot`.
    pub fn check_slot(self, slot: FxSlot) -> Result<Self, RangeError> {
        if self.allowed_in(slot) {
            Ok(self)
        } else {
            Err(RangeError::new("fx1 type", self.code() as i64, 0, 25))
        }
    }

    /// Values written on assignment. `None` positions are left untouched.
    pub const fn defaults(self) -> [Option<u8>; 6] {
        const fn all(v: [u8; 6]) -> [Option<u8>; 6] {
            [Some(v[0]), Some(v[1]), Some(v[2]), Some(v[3]), Some(v[4]), Some(v[5])]
        }
        match self {
            FxType::Off => [None; 6],
            FxType::Filter => all([0, 127, 0, 64, 0, 64]),
            FxType::Spatializer => all([127, 127, 127, 0, 127, 0]),
            FxType::Delay => all([48, 0, 127, 0, 127, 0]),
            FxType::Eq => all([32, 64, 64, 96, 64, 64]),
            FxType::DjEq => [Some(64), None, Some(64), Some(64), Some(64), Some(64)],
            FxType::Phaser => all([0, 64, 64, 0, 64, 64]),
            FxType::Flanger => all([0, 64, 64, 64, 64, 64]),
            FxType::Chorus => all([0, 64, 64, 0, 64, 64]),
            FxType::CombFilter => [Some(64), Some(64), Some(127), Some(64), None, Some(64)],
            FxType::PlateReverb => all([64, 64, 0, 0, 127, 64]),
            FxType::SpringReverb => [Some(64), None, None, Some(0), Some(127), Some(64)],
            FxType::DarkReverb => all([64, 64, 64, 0, 127, 64]),
            FxType::Compressor => all([24, 24, 64, 0, 0, 127]),
            FxType::Lofi => [Some(0), None, Some(0), Some(0), Some(0), Some(0)],
        }
    }

    /// Apply this type's defaults to a parameter window.
    pub fn apply_defaults(self, window: &mut [u8; 6]) {
        for (value, default) in window.iter_mut().zip(self.defaults()) {
            if let Some(default) = default {
                *value = default;
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FxType::Off => "Off",
            FxType::Filter => "Filter",
            FxType::Spatializer => "Spatializer",
            FxType::Delay => "Delay",
            FxType::Eq => "EQ",
            FxType::DjEq => "DJ EQ",
            FxType::Phaser => "Phaser",
            FxType::Flanger => "Flanger",
            FxType::Chorus => "Chorus",
            FxType::CombFilter => "Comb Filter",
            FxType::PlateReverb => "Plate Reverb",
            FxType::SpringReverb => "Spring Reverb",
            FxType::DarkReverb => "Dark Reverb",
            FxType::Compressor => "Compressor",
            FxType::Lofi => "Lo-Fi",
        }
    }
}

param_window!(
    /// Multimode filter.
    FilterParams { base: 0, width: 1, q: 2, depth: 3, attack: 4, decay: 5 }
);

param_window!(
    SpatializerParams { input: 0, depth: 1, width: 2, high_pass: 3, low_pass: 4, send: 5 }
);

param_window!(
    /// Echo freeze delay.
    DelayParams { time: 0, feedback: 1, volume: 2, base: 3, width: 4, send: 5 }
);

param_window!(
    /// Two-band parametric EQ.
    EqParams { freq1: 0, gain1: 1, q1: 2, freq2: 3, gain2: 4, q2: 5 }
);

param_window!(
    DjEqParams { low_shelf_freq: 0, high_shelf_freq: 2, low_gain: 3, mid_gain: 4, high_gain: 5 }
);

param_window!(
    PhaserParams { center: 0, depth: 1, spread: 2, feedback: 3, width: 4, mix: 5 }
);

param_window!(
    /// Shared by the flanger and chorus.
    ModulationParams { delay: 0, depth: 1, spread: 2, feedback: 3, width: 4, mix: 5 }
);

param_window!(
    CombFilterParams { pitch: 0, tune: 1, low_pass: 2, feedback: 3, mix: 5 }
);

param_window!(
    PlateReverbParams { time: 0, damping: 1, gate: 2, high_pass: 3, low_pass: 4, mix: 5 }
);

param_window!(
    SpringReverbParams { time: 0, high_pass: 3, low_pass: 4, mix: 5 }
);

param_window!(
    DarkReverbParams { time: 0, shelf_gain: 1, shelf_freq: 2, high_pass: 3, low_pass: 4, mix: 5 }
);

param_window!(
    CompressorParams { attack: 0, release: 1, threshold: 2, ratio: 3, gain: 4, mix: 5 }
);

param_window!(
    LofiParams { distortion: 0, am_freq: 2, sample_rate_reduction: 3, bit_reduction: 4, am_depth: 5 }
);

/// Effect parameters tagged by effect type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FxParams<T> {
    Off,
    Filter(FilterParams<T>),
    Spatializer(SpatializerParams<T>),
    Delay(DelayParams<T>),
    Eq(EqParams<T>),
    DjEq(DjEqParams<T>),
    Phaser(PhaserParams<T>),
    Flanger(ModulationParams<T>),
    Chorus(ModulationParams<T>),
    CombFilter(CombFilterParams<T>),
    PlateReverb(PlateReverbParams<T>),
    SpringReverb(SpringReverbParams<T>),
    DarkReverb(DarkReverbParams<T>),
    Compressor(CompressorParams<T>),
    Lofi(LofiParams<T>),
}

impl<T: Copy> FxParams<T> {
    /// Interpret a parameter window for `fx`.
    pub fn from_window(fx: FxType, w: &[T; 6]) -> Self {
        match fx {
            FxType::Off => FxParams::Off,
            FxType::Filter => FxParams::Filter(FilterParams::from_window(w)),
            FxType::Spatializer => FxParams::Spatializer(SpatializerParams::from_window(w)),
            FxType::Delay => FxParams::Delay(DelayParams::from_window(w)),
            FxType::Eq => FxParams::Eq(EqParams::from_window(w)),
            FxType::DjEq => FxParams::DjEq(DjEqParams::from_window(w)),
            FxType::Phaser => FxParams::Phaser(PhaserParams::from_window(w)),
            FxType::Flanger => FxParams::Flanger(ModulationParams::from_window(w)),
            FxType::Chorus => FxParams::Chorus(ModulationParams::from_window(w)),
            FxType::CombFilter => FxParams::CombFilter(CombFilterParams::from_window(w)),
            FxType::PlateReverb => FxParams::PlateReverb(PlateReverbParams::from_window(w)),
            FxType::SpringReverb => FxParams::SpringReverb(SpringReverbParams::from_window(w)),
            FxType::DarkReverb => FxParams::DarkReverb(DarkReverbParams::from_window(w)),
            FxType::Compressor => FxParams::Compressor(CompressorParams::from_window(w)),
            FxType::Lofi => FxParams::Lofi(LofiParams::from_window(w)),
        }
    }

    /// Write the variant's named fields into a parameter window.
    pub fn write_window(&self, w: &mut [T; 6]) {
        match self {
            FxParams::Off => {}
            FxParams::Filter(p) => p.write_window(w),
            FxParams::Spatializer(p) => p.write_window(w),
            FxParams::Delay(p) => p.write_window(w),
            FxParams::Eq(p) => p.write_window(w),
            FxParams::DjEq(p) => p.write_window(w),
            FxParams::Phaser(p) => p.write_window(w),
            FxParams::Flanger(p) | FxParams::Chorus(p) => p.write_window(w),
            FxParams::CombFilter(p) => p.write_window(w),
            FxParams::PlateReverb(p) => p.write_window(w),
            FxParams::SpringReverb(p) => p.write_window(w),
            FxParams::DarkReverb(p) => p.write_window(w),
            FxParams::Compressor(p) => p.write_window(w),
            FxParams::Lofi(p) => p.write_window(w),
        }
    }

    pub fn fx_type(&self) -> FxType {
        match self {
            FxParams::Off => FxType::Off,
            FxParams::Filter(_) => FxType::Filter,
            FxParams::Spatializer(_) => FxType::Spatializer,
            FxParams::Delay(_) => FxType::Delay,
            FxParams::Eq(_) => FxType::Eq,
            FxParams::DjEq(_) => FxType::DjEq,
            FxParams::Phaser(_) => FxType::Phaser,
            FxParams::Flanger(_) => FxType::Flanger,
            FxParams::Chorus(_) => FxType::Chorus,
            FxParams::CombFilter(_) => FxType::CombFilter,
            FxParams::PlateReverb(_) => FxType::PlateReverb,
            FxParams::SpringReverb(_) => FxType::SpringReverb,
            FxParams::DarkReverb(_) => FxType::DarkReverb,
            FxParams::Compressor(_) => FxType::Compressor,
            FxParams::Lofi(_) => FxType::Lofi,
        }
    }
}

impl FxParams<u8> {
    /// Named parameters of `fx` at their default values.
    pub fn defaults(fx: FxType) -> Self {
        let mut window = [0u8; 6];
        fx.apply_defaults(&mut window);
        Self::from_window(fx, &window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_positions(fx: FxType) -> Vec<usize> {
        let mut marked = [false; 6];
        let probe = FxParams::from_window(fx, &[true; 6]);
        probe.write_window(&mut marked);
        (0..6).filter(|&i| marked[i]).collect()
    }

    #[test]
    fn codes_round_trip() {
        for fx in FxType::ALL {
            assert_eq!(FxType::from_code(fx.code()), Ok(fx));
        }
        assert!(FxType::from_code(1).is_err());
    }

    #[test]
    fn delay_and_reverbs_are_fx2_only() {
        assert!(!FxType::Delay.allowed_in(FxSlot::Fx1));
        assert!(!FxType::DarkReverb.allowed_in(FxSlot::Fx1));
        assert!(FxType::Filter.allowed_in(FxSlot::Fx1));
        assert!(FxType::PlateReverb.allowed_in(FxSlot::Fx2));
        assert!(FxType::SpringReverb.check_slot(FxSlot::Fx1).is_err());
        let fx1_count = FxType::ALL.iter().filter(|fx| fx.allowed_in(FxSlot::Fx1)).count();
        assert_eq!(fx1_count, 11);
    }

    #[test]
    fn defaults_cover_exactly_the_named_positions() {
        for fx in FxType::ALL {
            let defaulted: Vec<usize> = (0..6).filter(|&i| fx.defaults()[i].is_some()).collect();
            assert_eq!(defaulted, named_positions(fx), "{}", fx.name());
        }
    }

    #[test]
    fn filter_and_delay_defaults() {
        assert_eq!(
            FxParams::defaults(FxType::Filter),
            FxParams::Filter(FilterParams { base: 0, width: 127, q: 0, depth: 64, attack: 0, decay: 64 })
        );
        assert_eq!(
            FxParams::defaults(FxType::Delay),
            FxParams::Delay(DelayParams { time: 48, feedback: 0, volume: 127, base: 0, width: 127, send: 0 })
        );
    }

    #[test]
    fn apply_defaults_leaves_unused_positions() {
        let mut window = [9u8; 6];
        FxType::SpringReverb.apply_defaults(&mut window);
        assert_eq!(window, [64, 9, 9, 0, 127, 64]);
        let mut window = [9u8; 6];
        FxType::Off.apply_defaults(&mut window);
        assert_eq!(window, [9; 6]);
    }

    #[test]
    fn params_serialize_with_type_tag() {
        assert_eq!(
            serde_json::to_value(FxParams::defaults(FxType::Filter)).unwrap(),
            serde_json::json!({
                "type": "filter",
                "base": 0,
                "width": 127,
                "q": 0,
                "depth": 64,
                "attack": 0,
                "decay": 64,
            })
        );
        assert_eq!(serde_json::to_value(FxParams::<u8>::Off).unwrap(), serde_json::json!({ "type": "off" }));
    }
}
