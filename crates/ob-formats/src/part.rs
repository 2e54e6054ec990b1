//! Part blocks: track sound settings, scenes and the active scene pair.

use ob_ir::RangeError;

use crate::layout::*;
use crate::midi_part_track::MidiPartTrack;
use crate::part_track::AudioPartTrack;
use crate::scene::Scene;
use crate::template;
use crate::FormatError;

/// View over one part.
#[derive(Clone, Copy, Debug)]
pub struct Part<B> {
    data: B,
}

fn track_index(track: usize) -> Result<usize, RangeError> {
    Ok(RangeError::check("track", track, 1, TRACK_COUNT)? - 1)
}

fn scene_range(scene: usize) -> Result<core::ops::Range<usize>, RangeError> {
    let index = RangeError::check("scene", scene, 1, SCENE_COUNT)? - 1;
    let start = PART_SCENES + index * SCENE_SIZE;
    Ok(start..start + SCENE_SIZE)
}

impl Part<Vec<u8>> {
    /// An owned part with default settings. `id` is the stored 0-based index.
    pub fn new(id: u8) -> Self {
        let mut data = vec![0u8; PART_SIZE];
        template::init_part(&mut data, id);
        Self { data }
    }
}

impl Default for Part<Vec<u8>> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<B: AsRef<[u8]>> Part<B> {
    pub fn from_bytes(data: B) -> Result<Self, FormatError> {
        let found = data.as_ref().len();
        if found != PART_SIZE {
            return Err(FormatError::WrongLength { expected: PART_SIZE, found });
        }
        if !data.as_ref().starts_with(PART_TAG) {
            return Err(FormatError::InvalidHeader);
        }
        Ok(Self { data })
    }

    pub(crate) fn wrap(data: B) -> Self {
        debug_assert_eq!(data.as_ref().len(), PART_SIZE);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.data
    }

    /// Stored part index, 0-3.
    pub fn part_id(&self) -> u8 {
        self.as_bytes()[PART_ID]
    }

    pub fn audio_track(&self, track: usize) -> Result<AudioPartTrack<&[u8]>, RangeError> {
        Ok(AudioPartTrack::wrap(self.as_bytes(), track_index(track)?))
    }

    pub fn midi_track(&self, track: usize) -> Result<MidiPartTrack<&[u8]>, RangeError> {
        Ok(MidiPartTrack::wrap(self.as_bytes(), track_index(track)?))
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = AudioPartTrack<&[u8]>> + '_ {
        (0..TRACK_COUNT).map(move |i| AudioPartTrack::wrap(self.as_bytes(), i))
    }

    /// Scene 1-16.
    pub fn scene(&self, scene: usize) -> Result<Scene<&[u8]>, RangeError> {
        let range = scene_range(scene)?;
        Ok(Scene::wrap(&self.as_bytes()[range]))
    }

    /// Scene assigned to crossfader side A, 0-15.
    pub fn active_scene_a(&self) -> u8 {
        self.as_bytes()[PART_SCENE_A]
    }

    pub fn active_scene_b(&self) -> u8 {
        self.as_bytes()[PART_SCENE_B]
    }

    pub fn cloned(&self) -> Part<Vec<u8>> {
        Part { data: self.as_bytes().to_vec() }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Part<B> {
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.data.as_mut()
    }

    pub fn audio_track_mut(&mut self, track: usize) -> Result<AudioPartTrack<&mut [u8]>, RangeError> {
        let index = track_index(track)?;
        Ok(AudioPartTrack::wrap(self.bytes_mut(), index))
    }

    pub fn midi_track_mut(&mut self, track: usize) -> Result<MidiPartTrack<&mut [u8]>, RangeError> {
        let index = track_index(track)?;
        Ok(MidiPartTrack::wrap(self.bytes_mut(), index))
    }

    pub fn scene_mut(&mut self, scene: usize) -> Result<Scene<&mut [u8]>, RangeError> {
        let range = scene_range(scene)?;
        Ok(Scene::wrap(&mut self.bytes_mut()[range]))
    }

    pub fn set_active_scene_a(&mut self, scene: u8) -> Result<(), RangeError> {
        let scene = RangeError::check_u8("active scene", scene, 0, SCENE_COUNT as u8 - 1)?;
        self.bytes_mut()[PART_SCENE_A] = scene;
        Ok(())
    }

    pub fn set_active_scene_b(&mut self, scene: u8) -> Result<(), RangeError> {
        let scene = RangeError::check_u8("active scene", scene, 0, SCENE_COUNT as u8 - 1)?;
        self.bytes_mut()[PART_SCENE_B] = scene;
        Ok(())
    }

    /// Copy another part's contents, keeping this part's id.
    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &Part<C>) {
        let id = self.part_id();
        self.bytes_mut().copy_from_slice(other.as_bytes());
        self.bytes_mut()[PART_ID] = id;
    }
}

impl<B: AsRef<[u8]>, C: AsRef<[u8]>> PartialEq<Part<C>> for Part<B> {
    fn eq(&self, other: &Part<C>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ob_ir::{FxSlot, FxType, MachineType, PlockSlot};

    #[test]
    fn default_part() {
        let part = Part::new(1);
        assert_eq!(part.part_id(), 1);
        assert_eq!(part.active_scene_a(), 0);
        assert_eq!(part.active_scene_b(), 8);
        assert_eq!(part.audio_tracks().count(), 8);
        for track in part.audio_tracks() {
            assert_eq!(track.fx_type(FxSlot::Fx1), Ok(FxType::Filter));
            assert_eq!(track.fx_type(FxSlot::Fx2), Ok(FxType::Delay));
        }
        for scene in 1..=16 {
            assert!(part.scene(scene).unwrap().is_empty());
        }
        assert!(part.scene(17).is_err());
        assert!(part.audio_track(0).is_err());
    }

    #[test]
    fn nested_edits() {
        let mut part = Part::new(0);
        part.audio_track_mut(3).unwrap().set_machine_type(MachineType::Thru);
        part.scene_mut(16).unwrap().track_mut(1).unwrap().set(PlockSlot::AMP_VOLUME, Some(0));
        assert_eq!(part.audio_track(3).unwrap().machine_type(), Ok(MachineType::Thru));
        assert_eq!(part.audio_track(2).unwrap().machine_type(), Ok(MachineType::Static));
        assert!(!part.scene(16).unwrap().is_empty());
        assert!(part.set_active_scene_a(16).is_err());
        part.set_active_scene_a(15).unwrap();
        assert_eq!(part.active_scene_a(), 15);
    }

    #[test]
    fn copy_keeps_id() {
        let mut source = Part::new(0);
        source.set_active_scene_b(3).unwrap();
        let mut dest = Part::new(2);
        dest.copy_from(&source);
        assert_eq!(dest.part_id(), 2);
        assert_eq!(dest.active_scene_b(), 3);
        assert_ne!(dest, source);
        let mut expected = source.cloned();
        expected.data[PART_ID] = 2;
        assert_eq!(dest, expected);
    }
}
