//! Thirty-two slot parameter-lock tables.
//!
//! Used per step in pattern tracks and per track in scenes. A slot holding
//! 255 is unset and inherits the part value.

use ob_ir::{
    AmpParams, FxParams, FxSlot, FxType, LfoParams, MachineParams, MachineType, PlockPage,
    PlockSlot, RangeError, PLOCK_DISABLED, PLOCK_MAX, PLOCK_SLOTS,
};

use serde::{Serialize, Serializer};

use crate::layout::PLOCK_TABLE_SIZE;
use crate::FormatError;

/// View over one parameter-lock table.
#[derive(Clone, Copy, Debug, Hash)]
pub struct PlockTable<B> {
    data: B,
}

impl PlockTable<[u8; PLOCK_TABLE_SIZE]> {
    /// An owned table with every slot unset.
    pub const fn new() -> Self {
        Self { data: [PLOCK_DISABLED; PLOCK_TABLE_SIZE] }
    }
}

impl Default for PlockTable<[u8; PLOCK_TABLE_SIZE]> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AsRef<[u8]>> PlockTable<B> {
    pub fn from_bytes(data: B) -> Result<Self, FormatError> {
        let found = data.as_ref().len();
        if found != PLOCK_TABLE_SIZE {
            return Err(FormatError::WrongLength { expected: PLOCK_TABLE_SIZE, found });
        }
        Ok(Self { data })
    }

    /// Callers guarantee the length.
    pub(crate) fn wrap(data: B) -> Self {
        debug_assert_eq!(data.as_ref().len(), PLOCK_TABLE_SIZE);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.data
    }

    pub fn get(&self, slot: PlockSlot) -> Option<u8> {
        match self.data.as_ref()[slot.index()] {
            PLOCK_DISABLED => None,
            v => Some(v),
        }
    }

    pub fn get_index(&self, index: usize) -> Result<Option<u8>, RangeError> {
        Ok(self.get(PlockSlot::new(index)?))
    }

    /// True when no slot is locked.
    pub fn is_empty(&self) -> bool {
        self.data.as_ref().iter().all(|&b| b == PLOCK_DISABLED)
    }

    /// Locked slots with their values.
    pub fn locks(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.data
            .as_ref()
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != PLOCK_DISABLED)
            .map(|(i, &v)| (i, v))
    }

    pub fn page(&self, page: PlockPage) -> [Option<u8>; 6] {
        let start = page.start();
        core::array::from_fn(|i| match self.data.as_ref()[start + i] {
            PLOCK_DISABLED => None,
            v => Some(v),
        })
    }

    /// Source page as seen by `machine`.
    pub fn machine(&self, machine: MachineType) -> MachineParams<Option<u8>> {
        MachineParams::from_window(machine, &self.page(PlockPage::Source))
    }

    pub fn fx(&self, slot: FxSlot, fx: FxType) -> FxParams<Option<u8>> {
        FxParams::from_window(fx, &self.page(PlockPage::fx(slot)))
    }

    pub fn lfo(&self) -> LfoParams<Option<u8>> {
        LfoParams::from_window(&self.page(PlockPage::Lfo))
    }

    pub fn amp(&self) -> AmpParams<Option<u8>> {
        AmpParams::from_window(&self.page(PlockPage::Amp))
    }

    pub fn cloned(&self) -> PlockTable<[u8; PLOCK_TABLE_SIZE]> {
        let mut data = [PLOCK_DISABLED; PLOCK_TABLE_SIZE];
        data.copy_from_slice(self.data.as_ref());
        PlockTable { data }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> PlockTable<B> {
    /// Lock a slot, clamping to 0-127, or unset it with `None`.
    pub fn set(&mut self, slot: PlockSlot, value: Option<u8>) {
        self.data.as_mut()[slot.index()] = encode(value);
    }

    pub fn set_index(&mut self, index: usize, value: Option<u8>) -> Result<(), RangeError> {
        self.set(PlockSlot::new(index)?, value);
        Ok(())
    }

    /// Unset every slot.
    pub fn clear(&mut self) {
        self.data.as_mut().fill(PLOCK_DISABLED);
    }

    pub fn set_page(&mut self, page: PlockPage, values: [Option<u8>; 6]) {
        let start = page.start();
        let data = self.data.as_mut();
        for (i, value) in values.into_iter().enumerate() {
            data[start + i] = encode(value);
        }
    }

    /// Write the named fields of `params`. Other source slots are untouched.
    pub fn set_machine(&mut self, params: &MachineParams<Option<u8>>) {
        let mut window = self.page(PlockPage::Source);
        params.write_window(&mut window);
        self.set_page(PlockPage::Source, window);
    }

    pub fn set_fx(&mut self, slot: FxSlot, params: &FxParams<Option<u8>>) {
        let page = PlockPage::fx(slot);
        let mut window = self.page(page);
        params.write_window(&mut window);
        self.set_page(page, window);
    }

    pub fn set_lfo(&mut self, params: &LfoParams<Option<u8>>) {
        let mut window = self.page(PlockPage::Lfo);
        params.write_window(&mut window);
        self.set_page(PlockPage::Lfo, window);
    }

    pub fn set_amp(&mut self, params: &AmpParams<Option<u8>>) {
        let mut window = self.page(PlockPage::Amp);
        params.write_window(&mut window);
        self.set_page(PlockPage::Amp, window);
    }

    pub fn copy_from<C: AsRef<[u8]>>(&mut self, other: &PlockTable<C>) {
        self.data.as_mut().copy_from_slice(other.as_bytes());
    }
}

fn encode(value: Option<u8>) -> u8 {
    match value {
        Some(v) => v.min(PLOCK_MAX),
        None => PLOCK_DISABLED,
    }
}

impl<B: AsRef<[u8]>, C: AsRef<[u8]>> PartialEq<PlockTable<C>> for PlockTable<B> {
    fn eq(&self, other: &PlockTable<C>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<B: AsRef<[u8]>> Eq for PlockTable<B> {}

/// Serialized as a map from slot index to locked value. Unset slots are
/// left out.
impl<B: AsRef<[u8]>> Serialize for PlockTable<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.locks())
    }
}

const _: () = assert!(PLOCK_SLOTS == PLOCK_TABLE_SIZE);

#[cfg(test)]
mod tests {
    use super::*;
    use ob_ir::{FilterParams, SampleParams};

    #[test]
    fn fresh_table_is_unset() {
        let table = PlockTable::new();
        for i in 0..32 {
            assert_eq!(table.get_index(i), Ok(None));
        }
        assert!(table.is_empty());
        assert!(table.get_index(32).is_err());
    }

    #[test]
    fn set_clamps_and_unsets() {
        let mut table = PlockTable::new();
        table.set(PlockSlot::AMP_VOLUME, Some(100));
        table.set(PlockSlot::AMP_BALANCE, Some(200));
        assert_eq!(table.get(PlockSlot::AMP_VOLUME), Some(100));
        assert_eq!(table.get(PlockSlot::AMP_BALANCE), Some(127));
        assert_eq!(table.locks().collect::<Vec<_>>(), vec![(15, 100), (16, 127)]);

        table.set(PlockSlot::AMP_VOLUME, None);
        assert_eq!(table.as_bytes()[15], 255);
    }

    #[test]
    fn typed_pages_touch_only_named_slots() {
        let mut table = PlockTable::new();
        table.set_machine(&MachineParams::Flex(SampleParams {
            pitch: Some(70),
            start: None,
            length: None,
            rate: Some(127),
            retrig: None,
            retrig_time: None,
        }));
        assert_eq!(table.get_index(0), Ok(Some(70)));
        assert_eq!(table.get_index(3), Ok(Some(127)));
        assert_eq!(table.get_index(1), Ok(None));

        let fx = table.fx(FxSlot::Fx1, FxType::Filter);
        assert_eq!(fx, FxParams::Filter(FilterParams::default()));
        table.set_fx(
            FxSlot::Fx2,
            &FxParams::Filter(FilterParams { base: Some(10), ..FilterParams::default() }),
        );
        assert_eq!(table.get_index(24), Ok(Some(10)));
        assert_eq!(table.get_index(18), Ok(None));
    }

    #[test]
    fn views_compare_by_bytes() {
        let mut bytes = vec![PLOCK_DISABLED; 32];
        let owned = PlockTable::new();
        {
            let view = PlockTable::from_bytes(&mut bytes[..]).unwrap();
            assert_eq!(view, owned);
        }
        let mut view = PlockTable::from_bytes(&mut bytes[..]).unwrap();
        view.set(PlockSlot::FLEX_SLOT, Some(3));
        assert_ne!(view.cloned(), owned);
        assert!(PlockTable::from_bytes(&bytes[..31]).is_err());
    }

    #[test]
    fn serializes_set_slots_only() {
        let mut table = PlockTable::new();
        assert_eq!(serde_json::to_string(&table).unwrap(), "{}");
        table.set_index(3, Some(12)).unwrap();
        table.set_index(20, Some(0)).unwrap();
        assert_eq!(serde_json::to_value(table).unwrap(), serde_json::json!({ "3": 12, "20": 0 }));
    }
}
