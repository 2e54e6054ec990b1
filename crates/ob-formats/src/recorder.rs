//! Twelve-byte recorder buffer setup of an audio part track.

use ob_ir::{QRecMode, RangeError, RecTrigMode, RecordingLength, RecordingSource};

use crate::layout::*;
use crate::FormatError;

/// View over one track's recorder setup.
#[derive(Clone, Copy, Debug)]
pub struct Recorder<B> {
    data: B,
}

impl Recorder<Vec<u8>> {
    /// An owned setup with default values.
    pub fn new() -> Self {
        let mut data = vec![0u8; RECORDER_SIZE];
        crate::template::init_recorder(&mut data);
        Self { data }
    }
}

impl Default for Recorder<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AsRef<[u8]>> Recorder<B> {
    pub fn from_bytes(data: B) -> Result<Self, FormatError> {
        let found = data.as_ref().len();
        if found != RECORDER_SIZE {
            return Err(FormatError::WrongLength { expected: RECORDER_SIZE, found });
        }
        Ok(Self { data })
    }

    pub(crate) fn wrap(data: B) -> Self {
        debug_assert_eq!(data.as_ref().len(), RECORDER_SIZE);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.data
    }

    fn byte(&self, field: usize) -> u8 {
        self.as_bytes()[field]
    }

    pub fn source(&self) -> Result<RecordingSource, RangeError> {
        RecordingSource::from_fields(self.byte(REC_IN_AB), self.byte(REC_IN_CD), self.byte(REC_SRC3))
    }

    pub fn length(&self) -> Result<RecordingLength, RangeError> {
        RecordingLength::from_code(self.byte(REC_LENGTH))
    }

    pub fn trig_mode(&self) -> Result<RecTrigMode, RangeError> {
        RecTrigMode::from_code(self.byte(REC_TRIG))
    }

    pub fn is_loop(&self) -> bool {
        self.byte(REC_LOOP) != 0
    }

    pub fn fade_in(&self) -> u8 {
        self.byte(REC_FADE_IN)
    }

    pub fn fade_out(&self) -> u8 {
        self.byte(REC_FADE_OUT)
    }

    pub fn ab_gain(&self) -> u8 {
        self.byte(REC_AB_GAIN)
    }

    pub fn cd_gain(&self) -> u8 {
        self.byte(REC_CD_GAIN)
    }

    /// Quantized record start.
    pub fn qrec(&self) -> Result<QRecMode, RangeError> {
        QRecMode::from_code(self.byte(REC_QREC))
    }

    /// Quantized playback.
    pub fn qpl(&self) -> Result<QRecMode, RangeError> {
        QRecMode::from_code(self.byte(REC_QPL))
    }

    pub fn cloned(&self) -> Recorder<Vec<u8>> {
        Recorder { data: self.as_bytes().to_vec() }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Recorder<B> {
    fn set_byte(&mut self, field: usize, value: u8) {
        self.data.as_mut()[field] = value;
    }

    /// Select the source. All three source fields are rewritten.
    pub fn set_source(&mut self, source: RecordingSource) -> Result<(), RangeError> {
        let [in_ab, in_cd, src3] = source.to_fields()?;
        self.set_byte(REC_IN_AB, in_ab);
        self.set_byte(REC_IN_CD, in_cd);
        self.set_byte(REC_SRC3, src3);
        Ok(())
    }

    pub fn set_length(&mut self, length: RecordingLength) -> Result<(), RangeError> {
        let code = length.to_code()?;
        self.set_byte(REC_LENGTH, code);
        Ok(())
    }

    pub fn set_trig_mode(&mut self, mode: RecTrigMode) {
        self.set_byte(REC_TRIG, mode.code());
    }

    pub fn set_loop(&mut self, on: bool) {
        self.set_byte(REC_LOOP, on as u8);
    }

    pub fn set_fade_in(&mut self, value: u8) {
        self.set_byte(REC_FADE_IN, value);
    }

    pub fn set_fade_out(&mut self, value: u8) {
        self.set_byte(REC_FADE_OUT, value);
    }

    pub fn set_ab_gain(&mut self, value: u8) {
        self.set_byte(REC_AB_GAIN, value);
    }

    pub fn set_cd_gain(&mut self, value: u8) {
        self.set_byte(REC_CD_GAIN, value);
    }

    pub fn set_qrec(&mut self, mode: QRecMode) -> Result<(), RangeError> {
        let code = mode.to_code()?;
        self.set_byte(REC_QREC, code);
        Ok(())
    }

    pub fn set_qpl(&mut self, mode: QRecMode) -> Result<(), RangeError> {
        let code = mode.to_code()?;
        self.set_byte(REC_QPL, code);
        Ok(())
    }

    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &Recorder<C>) {
        self.data.as_mut().copy_from_slice(other.as_bytes());
    }
}

impl<B: AsRef<[u8]>, C: AsRef<[u8]>> PartialEq<Recorder<C>> for Recorder<B> {
    fn eq(&self, other: &Recorder<C>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
