//! Scenes: one parameter-lock table per audio track.

use ob_ir::RangeError;

use crate::layout::{PLOCK_TABLE_SIZE, SCENE_SIZE, TRACK_COUNT};
use crate::plock::PlockTable;
use crate::FormatError;

/// View over one scene.
#[derive(Clone, Copy, Debug)]
pub struct Scene<B> {
    data: B,
}

fn track_range(track: usize) -> Result<core::ops::Range<usize>, RangeError> {
    let start = (RangeError::check("track", track, 1, TRACK_COUNT)? - 1) * PLOCK_TABLE_SIZE;
    Ok(start..start + PLOCK_TABLE_SIZE)
}

impl Scene<Vec<u8>> {
    /// An owned scene with nothing locked.
    pub fn new() -> Self {
        Self { data: vec![ob_ir::PLOCK_DISABLED; SCENE_SIZE] }
    }
}

impl Default for Scene<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AsRef<[u8]>> Scene<B> {
    pub fn from_bytes(data: B) -> Result<Self, FormatError> {
        let found = data.as_ref().len();
        if found != SCENE_SIZE {
            return Err(FormatError::WrongLength { expected: SCENE_SIZE, found });
        }
        Ok(Self { data })
    }

    pub(crate) fn wrap(data: B) -> Self {
        debug_assert_eq!(data.as_ref().len(), SCENE_SIZE);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Locks for track 1-8.
    pub fn track(&self, track: usize) -> Result<PlockTable<&[u8]>, RangeError> {
        let range = track_range(track)?;
        Ok(PlockTable::wrap(&self.as_bytes()[range]))
    }

    pub fn tracks(&self) -> impl Iterator<Item = PlockTable<&[u8]>> + '_ {
        self.as_bytes().chunks_exact(PLOCK_TABLE_SIZE).map(PlockTable::wrap)
    }

    /// True when no track has a lock.
    pub fn is_empty(&self) -> bool {
        self.tracks().all(|t| t.is_empty())
    }

    pub fn cloned(&self) -> Scene<Vec<u8>> {
        Scene { data: self.as_bytes().to_vec() }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Scene<B> {
    pub fn track_mut(&mut self, track: usize) -> Result<PlockTable<&mut [u8]>, RangeError> {
        let range = track_range(track)?;
        Ok(PlockTable::wrap(&mut self.data.as_mut()[range]))
    }

    /// Unlock every slot of every track.
    pub fn clear(&mut self) {
        self.data.as_mut().fill(ob_ir::PLOCK_DISABLED);
    }

    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &Scene<C>) {
        self.data.as_mut().copy_from_slice(other.as_bytes());
    }
}

impl<B: AsRef<[u8]>, C: AsRef<[u8]>> PartialEq<Scene<C>> for Scene<B> {
    fn eq(&self, other: &Scene<C>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ob_ir::PlockSlot;

    #[test]
    fn fresh_scene_is_empty() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        for track in 1..=8 {
            let table = scene.track(track).unwrap();
            assert!((0..32).all(|i| table.get_index(i) == Ok(None)));
        }
        assert!(scene.track(9).is_err());
    }

    #[test]
    fn locks_and_clear() {
        let mut scene = Scene::new();
        scene.track_mut(8).unwrap().set(PlockSlot::AMP_VOLUME, Some(0));
        assert!(!scene.is_empty());
        assert_eq!(scene.track(8).unwrap().get(PlockSlot::AMP_VOLUME), Some(0));
        assert!(scene.track(7).unwrap().is_empty());
        scene.clear();
        assert_eq!(scene, Scene::new());
    }
}
