//! Audio track settings of a part.
//!
//! A part stores each field as an array over its eight tracks, so a track
//! view holds the whole part buffer and a track index.

use ob_ir::{
    AmpParams, FxParams, FxSlot, FxType, LfoParams, MachineParams, MachineType, PlockPage,
    RangeError, SampleSetup, SampleSlot,
};
use tracing::trace;

use crate::layout::*;
use crate::recorder::Recorder;

/// View over one audio track of a part.
#[derive(Clone, Copy, Debug)]
pub struct AudioPartTrack<B> {
    part: B,
    index: usize,
}

fn page_offset(page: PlockPage) -> usize {
    page.start() - PlockPage::Lfo.start()
}

fn six(bytes: &[u8]) -> [u8; 6] {
    let mut window = [0u8; 6];
    window.copy_from_slice(&bytes[..6]);
    window
}

impl<B: AsRef<[u8]>> AudioPartTrack<B> {
    /// `index` is 0-based and already checked by the caller.
    pub(crate) fn wrap(part: B, index: usize) -> Self {
        debug_assert_eq!(part.as_ref().len(), PART_SIZE);
        debug_assert!(index < TRACK_COUNT);
        Self { part, index }
    }

    fn bytes(&self) -> &[u8] {
        self.part.as_ref()
    }

    /// Track number, 1-8.
    pub fn track(&self) -> usize {
        self.index + 1
    }

    pub fn machine_type(&self) -> Result<MachineType, RangeError> {
        MachineType::from_code(self.bytes()[PART_MACHINE_TYPES + self.index])
    }

    fn machine_window(&self, base: usize, machine: MachineType) -> [u8; 6] {
        let at = base + self.index * MACHINE_BLOCK_SIZE + machine.window_offset();
        six(&self.bytes()[at..])
    }

    /// Parameters of the current machine.
    pub fn machine(&self) -> Result<MachineParams<u8>, RangeError> {
        Ok(self.machine_params(self.machine_type()?))
    }

    /// Parameters stored for `machine`, whether or not it is selected.
    pub fn machine_params(&self, machine: MachineType) -> MachineParams<u8> {
        MachineParams::from_window(machine, &self.machine_window(PART_MACHINE_VALUES, machine))
    }

    /// Setup page of a sample machine.
    pub fn sample_setup(&self, machine: MachineType) -> Result<SampleSetup<u8>, RangeError> {
        if !machine.is_sampler() {
            return Err(RangeError::new("sample machine", machine.code() as i64, 0, 1));
        }
        Ok(SampleSetup::from_window(&self.machine_window(PART_MACHINE_SETUP, machine)))
    }

    /// Raw setup window of any machine.
    pub fn machine_setup(&self, machine: MachineType) -> [u8; 6] {
        self.machine_window(PART_MACHINE_SETUP, machine)
    }

    fn fx_type_offset(&self, slot: FxSlot) -> usize {
        let base = match slot {
            FxSlot::Fx1 => PART_FX1_TYPES,
            FxSlot::Fx2 => PART_FX2_TYPES,
        };
        base + self.index
    }

    fn params_offset(&self, page: PlockPage) -> usize {
        PART_TRACK_PARAMS + self.index * TRACK_PARAMS_SIZE + page_offset(page)
    }

    fn page(&self, page: PlockPage) -> [u8; 6] {
        six(&self.bytes()[self.params_offset(page)..])
    }

    pub fn fx_type(&self, slot: FxSlot) -> Result<FxType, RangeError> {
        FxType::from_code(self.bytes()[self.fx_type_offset(slot)])
    }

    /// Named parameters of the effect in `slot`.
    pub fn fx(&self, slot: FxSlot) -> Result<FxParams<u8>, RangeError> {
        Ok(FxParams::from_window(self.fx_type(slot)?, &self.page(PlockPage::fx(slot))))
    }

    /// Raw effect parameter 1-6.
    pub fn fx_param(&self, slot: FxSlot, param: usize) -> Result<u8, RangeError> {
        let param = RangeError::check("fx param", param, 1, 6)?;
        Ok(self.page(PlockPage::fx(slot))[param - 1])
    }

    pub fn lfo(&self) -> LfoParams<u8> {
        LfoParams::from_window(&self.page(PlockPage::Lfo))
    }

    pub fn amp(&self) -> AmpParams<u8> {
        AmpParams::from_window(&self.page(PlockPage::Amp))
    }

    /// (main, cue) volume.
    pub fn volume(&self) -> (u8, u8) {
        let at = PART_VOLUMES + 2 * self.index;
        (self.bytes()[at], self.bytes()[at + 1])
    }

    fn slot_byte(&self, field: usize) -> u8 {
        self.bytes()[PART_SLOTS_STRUCT + self.index * SLOT_STRUCT_SIZE + field]
    }

    pub fn static_slot(&self) -> u8 {
        self.slot_byte(SLOT_STATIC)
    }

    pub fn flex_slot(&self) -> Result<SampleSlot, RangeError> {
        SampleSlot::from_code(self.slot_byte(SLOT_FLEX))
    }

    pub fn recorder_slot(&self) -> u8 {
        self.slot_byte(SLOT_RECORDER)
    }

    /// Opaque per-track setup bytes.
    pub fn audio_setup(&self) -> &[u8] {
        let at = PART_AUDIO_SETUP + self.index * AUDIO_SETUP_SIZE;
        &self.bytes()[at..at + AUDIO_SETUP_SIZE]
    }

    fn recorder_range(&self) -> core::ops::Range<usize> {
        let at = PART_RECORDERS + self.index * RECORDER_SIZE;
        at..at + RECORDER_SIZE
    }

    pub fn recorder(&self) -> Recorder<&[u8]> {
        Recorder::wrap(&self.bytes()[self.recorder_range()])
    }

    /// Compare the striped regions of two tracks.
    pub fn same_settings<C: AsRef<[u8]>>(&self, other: &AudioPartTrack<C>) -> bool {
        AUDIO_PART_TRACK_REGIONS.iter().all(|&(base, stride)| {
            let a = base + self.index * stride;
            let b = base + other.index * stride;
            self.bytes()[a..a + stride] == other.bytes()[b..b + stride]
        })
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> AudioPartTrack<B> {
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.part.as_mut()
    }

    /// Select the machine. Stored parameters of every machine are kept.
    pub fn set_machine_type(&mut self, machine: MachineType) {
        let at = PART_MACHINE_TYPES + self.index;
        self.bytes_mut()[at] = machine.code();
    }

    fn set_machine_window(&mut self, base: usize, machine: MachineType, window: [u8; 6]) {
        let at = base + self.index * MACHINE_BLOCK_SIZE + machine.window_offset();
        self.bytes_mut()[at..at + 6].copy_from_slice(&window);
    }

    /// Store parameters for the machine named by the variant. The selected
    /// machine is unchanged.
    pub fn set_machine_params(&mut self, params: &MachineParams<u8>) {
        let machine = params.machine_type();
        let mut window = self.machine_window(PART_MACHINE_VALUES, machine);
        params.write_window(&mut window);
        self.set_machine_window(PART_MACHINE_VALUES, machine, window);
    }

    pub fn set_sample_setup(&mut self, machine: MachineType, setup: &SampleSetup<u8>) -> Result<(), RangeError> {
        self.sample_setup(machine)?;
        let mut window = self.machine_setup(machine);
        setup.write_window(&mut window);
        self.set_machine_window(PART_MACHINE_SETUP, machine, window);
        Ok(())
    }

    fn set_page(&mut self, page: PlockPage, window: [u8; 6]) {
        let at = self.params_offset(page);
        self.bytes_mut()[at..at + 6].copy_from_slice(&window);
    }

    /// Assign an effect and reset its parameters to the type's defaults.
    pub fn set_fx_type(&mut self, slot: FxSlot, fx: FxType) -> Result<(), RangeError> {
        let fx = fx.check_slot(slot)?;
        let at = self.fx_type_offset(slot);
        self.bytes_mut()[at] = fx.code();
        let page = PlockPage::fx(slot);
        let mut window = self.page(page);
        fx.apply_defaults(&mut window);
        self.set_page(page, window);
        trace!(track = self.track(), ?slot, ?fx, "fx assigned");
        Ok(())
    }

    /// Write named effect parameters, assigning the variant's type first if
    /// it differs from the current one.
    pub fn set_fx(&mut self, slot: FxSlot, params: &FxParams<u8>) -> Result<(), RangeError> {
        let fx = params.fx_type().check_slot(slot)?;
        if self.fx_type(slot).ok() != Some(fx) {
            self.set_fx_type(slot, fx)?;
        }
        let page = PlockPage::fx(slot);
        let mut window = self.page(page);
        params.write_window(&mut window);
        self.set_page(page, window);
        Ok(())
    }

    pub fn set_fx_param(&mut self, slot: FxSlot, param: usize, value: u8) -> Result<(), RangeError> {
        let param = RangeError::check("fx param", param, 1, 6)?;
        let at = self.params_offset(PlockPage::fx(slot)) + param - 1;
        self.bytes_mut()[at] = value;
        Ok(())
    }

    pub fn set_lfo(&mut self, params: &LfoParams<u8>) {
        let mut window = self.page(PlockPage::Lfo);
        params.write_window(&mut window);
        self.set_page(PlockPage::Lfo, window);
    }

    pub fn set_amp(&mut self, params: &AmpParams<u8>) {
        let mut window = self.page(PlockPage::Amp);
        params.write_window(&mut window);
        self.set_page(PlockPage::Amp, window);
    }

    pub fn set_volume(&mut self, main: u8, cue: u8) -> Result<(), RangeError> {
        RangeError::check_u8("main volume", main, 0, 127)?;
        RangeError::check_u8("cue volume", cue, 0, 127)?;
        let at = PART_VOLUMES + 2 * self.index;
        self.bytes_mut()[at] = main;
        self.bytes_mut()[at + 1] = cue;
        Ok(())
    }

    fn set_slot_byte(&mut self, field: usize, value: u8) {
        let at = PART_SLOTS_STRUCT + self.index * SLOT_STRUCT_SIZE + field;
        self.bytes_mut()[at] = value;
    }

    /// Static sample slot, 0-127.
    pub fn set_static_slot(&mut self, slot: u8) -> Result<(), RangeError> {
        let slot = RangeError::check_u8("static slot", slot, 0, 127)?;
        self.set_slot_byte(SLOT_STATIC, slot);
        Ok(())
    }

    pub fn set_flex_slot(&mut self, slot: SampleSlot) -> Result<(), RangeError> {
        let code = slot.to_code()?;
        self.set_slot_byte(SLOT_FLEX, code);
        Ok(())
    }

    /// Recorder buffer slot, 0-7.
    pub fn set_recorder_slot(&mut self, slot: u8) -> Result<(), RangeError> {
        let slot = RangeError::check_u8("recorder slot", slot, 0, 7)?;
        self.set_slot_byte(SLOT_RECORDER, slot);
        Ok(())
    }

    pub fn recorder_mut(&mut self) -> Recorder<&mut [u8]> {
        let range = self.recorder_range();
        Recorder::wrap(&mut self.bytes_mut()[range])
    }

    /// Copy every striped field from `other`, which may be another track of
    /// any part.
    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &AudioPartTrack<C>) {
        for &(base, stride) in AUDIO_PART_TRACK_REGIONS.iter() {
            let src = base + other.index * stride;
            let dst = base + self.index * stride;
            self.bytes_mut()[dst..dst + stride].copy_from_slice(&other.bytes()[src..src + stride]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ob_ir::{DelayParams, FilterParams, RecordingSource, SampleParams};

    fn part() -> Vec<u8> {
        let mut buf = vec![0u8; PART_SIZE];
        crate::template::init_part(&mut buf, 0);
        buf
    }

    #[test]
    fn defaults() {
        let buf = part();
        let track = AudioPartTrack::wrap(&buf[..], 2);
        assert_eq!(track.track(), 3);
        assert_eq!(track.machine_type(), Ok(MachineType::Static));
        assert_eq!(
            track.machine(),
            Ok(MachineParams::Static(SampleParams {
                pitch: 64,
                start: 0,
                length: 0,
                rate: 127,
                retrig: 0,
                retrig_time: 79,
            }))
        );
        assert_eq!(track.fx_type(FxSlot::Fx1), Ok(FxType::Filter));
        assert_eq!(track.fx(FxSlot::Fx2), Ok(FxParams::defaults(FxType::Delay)));
        assert_eq!(track.volume(), (108, 108));
        assert_eq!(track.amp().volume, 108);
        assert_eq!(track.flex_slot(), Ok(SampleSlot::Sample(2)));
        assert_eq!(track.sample_setup(MachineType::Flex).unwrap().loop_mode, 3);
        assert!(track.sample_setup(MachineType::Thru).is_err());
    }

    #[test]
    fn fx_assignment_resets_defaults() {
        let mut buf = part();
        let mut track = AudioPartTrack::wrap(&mut buf[..], 0);
        track.set_fx_param(FxSlot::Fx1, 2, 5).unwrap();
        track.set_fx_type(FxSlot::Fx1, FxType::Compressor).unwrap();
        assert_eq!(track.fx(FxSlot::Fx1), Ok(FxParams::defaults(FxType::Compressor)));
        track.set_fx_type(FxSlot::Fx1, FxType::Filter).unwrap();
        assert_eq!(
            track.fx(FxSlot::Fx1),
            Ok(FxParams::Filter(FilterParams { base: 0, width: 127, q: 0, depth: 64, attack: 0, decay: 64 }))
        );
        assert!(track.set_fx_type(FxSlot::Fx1, FxType::Delay).is_err());
        assert_eq!(track.fx_type(FxSlot::Fx1), Ok(FxType::Filter));
    }

    #[test]
    fn typed_fx_sets_type() {
        let mut buf = part();
        let mut track = AudioPartTrack::wrap(&mut buf[..], 5);
        track.set_fx_type(FxSlot::Fx2, FxType::Off).unwrap();
        let delay = DelayParams { time: 10, feedback: 20, volume: 30, base: 40, width: 50, send: 60 };
        track.set_fx(FxSlot::Fx2, &FxParams::Delay(delay)).unwrap();
        assert_eq!(track.fx_type(FxSlot::Fx2), Ok(FxType::Delay));
        assert_eq!(track.fx(FxSlot::Fx2), Ok(FxParams::Delay(delay)));
        assert_eq!(track.fx_param(FxSlot::Fx2, 6), Ok(60));
        assert!(track.fx_param(FxSlot::Fx2, 7).is_err());
    }

    #[test]
    fn machine_windows_are_independent() {
        let mut buf = part();
        let mut track = AudioPartTrack::wrap(&mut buf[..], 1);
        track.set_machine_type(MachineType::Flex);
        track.set_machine_params(&MachineParams::Static(SampleParams {
            pitch: 1,
            start: 2,
            length: 3,
            rate: 4,
            retrig: 5,
            retrig_time: 6,
        }));
        assert_eq!(track.machine_type(), Ok(MachineType::Flex));
        assert_eq!(track.machine(), Ok(track.machine_params(MachineType::Flex)));
        match track.machine_params(MachineType::Static) {
            MachineParams::Static(p) => assert_eq!(p.pitch, 1),
            other => panic!("unexpected {other:?}"),
        }
        match track.machine() {
            Ok(MachineParams::Flex(p)) => assert_eq!(p.pitch, 64),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn slots_and_recorder() {
        let mut buf = part();
        let mut track = AudioPartTrack::wrap(&mut buf[..], 7);
        track.set_flex_slot(SampleSlot::Recorder(3)).unwrap();
        assert_eq!(track.flex_slot(), Ok(SampleSlot::Recorder(3)));
        assert_eq!(track.slot_byte(SLOT_FLEX), 130);
        assert!(track.set_static_slot(128).is_err());
        track.recorder_mut().set_source(RecordingSource::Main).unwrap();
        assert_eq!(track.recorder().source(), Ok(RecordingSource::Main));
    }

    #[test]
    fn copy_between_tracks() {
        let mut buf = part();
        {
            let mut source = AudioPartTrack::wrap(&mut buf[..], 0);
            source.set_volume(90, 80).unwrap();
            source.set_machine_type(MachineType::Pickup);
        }
        let source = AudioPartTrack::wrap(buf.clone(), 0);
        let mut dest = AudioPartTrack::wrap(&mut buf[..], 4);
        dest.copy_from(&source);
        assert_eq!(dest.volume(), (90, 80));
        assert_eq!(dest.machine_type(), Ok(MachineType::Pickup));
        assert_eq!(dest.track(), 5);
        assert!(dest.same_settings(&source));
    }
}
