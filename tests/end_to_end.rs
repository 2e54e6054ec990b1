//! End-to-end test: edit a default bank, write it out and read it back.

use ob_formats::layout::{BANK_HEADER, BANK_VERSION, VERSION_OFFSET};
use ob_formats::{validate, Bank, BankOptions, Baseline, ChecksumPolicy};
use ob_ir::{Condition, PlockSlot, StepSet, TrigCondition};

fn strict() -> BankOptions {
    BankOptions { baseline: Some(Baseline::default()), checksum: ChecksumPolicy::Strict }
}

#[test]
fn edit_serialize_reload() {
    let mut bank = Bank::new();
    {
        let mut pattern = bank.pattern_mut(1).unwrap();
        let mut track = pattern.audio_track_mut(1).unwrap();
        track.set_trigs(StepSet::from_steps([1, 5, 9, 13]).unwrap());
        track.set_condition(5, TrigCondition::new(Condition::Fill)).unwrap();
        track.set_plock(5, PlockSlot::AMP_VOLUME, Some(100)).unwrap();
    }
    let bytes = bank.serialize().to_vec();

    assert_eq!(validate(&bytes), Ok(()));
    assert_eq!(&bytes[..BANK_HEADER.len()], BANK_HEADER);
    assert_eq!(bytes[VERSION_OFFSET], BANK_VERSION);

    let reloaded = Bank::open(bytes, &strict()).unwrap_or_else(|e| panic!("reload failed: {e}"));
    assert_eq!(reloaded.verify_checksum(), Ok(()));

    let pattern = reloaded.pattern(1).unwrap();
    let track = pattern.audio_track(1).unwrap();
    assert_eq!(track.trigs().to_vec().as_slice(), &[1, 5, 9, 13]);

    let step = track.step(5).unwrap();
    assert!(step.active);
    assert!(!step.trigless);
    assert_eq!(step.condition.condition(), Ok(Condition::Fill));
    assert_eq!(step.plocks.get(PlockSlot::AMP_VOLUME), Some(100));
    assert_eq!(step.plocks.locks().count(), 1);

    let untouched = track.step(6).unwrap();
    assert!(!untouched.active);
    assert!(untouched.plocks.is_empty());
}

#[test]
fn repeat_and_condition_stay_independent() {
    let mut bank = Bank::new();
    {
        let mut pattern = bank.pattern_mut(4).unwrap();
        let mut track = pattern.midi_track_mut(2).unwrap();
        let mut cond = TrigCondition::new(Condition::from_probability(Some(0.30)).unwrap());
        cond.set_repeats(5).unwrap();
        track.set_condition(7, cond).unwrap();
    }
    let bytes = bank.serialize().to_vec();
    let reloaded = Bank::open(bytes, &strict()).unwrap_or_else(|e| panic!("reload failed: {e}"));
    let cond = reloaded.pattern(4).unwrap().midi_track(2).unwrap().condition(7).unwrap();
    assert_eq!(cond.condition(), Ok(Condition::Percent33));
    assert_eq!(cond.repeats(), 5);
}
