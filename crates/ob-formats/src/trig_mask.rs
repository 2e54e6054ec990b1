//! Packed eight-byte step masks.
//!
//! Steps form four pages of 16. Pages are stored in reverse order, so steps
//! 1-16 live in bytes 6-7 and steps 49-64 in bytes 0-1. Within a page the
//! later byte holds the lower eight steps.

use ob_ir::{RangeError, StepSet, STEP_COUNT};

use crate::layout::MASK_SIZE;

/// Byte index and bit for a step (1-64).
pub fn mask_position(step: u8) -> Result<(usize, u8), RangeError> {
    RangeError::check_u8("step", step, 1, STEP_COUNT)?;
    let page = (step as usize - 1) / 16;
    let pos = (step - 1) % 16;
    let pair = 6 - 2 * page;
    Ok(if pos < 8 { (pair + 1, pos) } else { (pair, pos - 8) })
}

pub fn decode_mask(mask: &[u8; MASK_SIZE]) -> StepSet {
    let mut bits = 0u64;
    for step in 1..=STEP_COUNT {
        if let Ok((byte, bit)) = mask_position(step) {
            if mask[byte] & (1 << bit) != 0 {
                bits |= 1 << (step - 1);
            }
        }
    }
    StepSet::from_bits(bits)
}

/// Encode a set into a fresh mask. Bytes start zeroed.
pub fn encode_mask(steps: StepSet) -> [u8; MASK_SIZE] {
    let mut mask = [0u8; MASK_SIZE];
    for step in steps.iter() {
        if let Ok((byte, bit)) = mask_position(step) {
            mask[byte] |= 1 << bit;
        }
    }
    mask
}

/// Encode a list of step numbers, rejecting any outside 1-64.
pub fn encode_steps(steps: &[u8]) -> Result<[u8; MASK_SIZE], RangeError> {
    Ok(encode_mask(StepSet::from_steps(steps.iter().copied())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_is_last_pair() {
        assert_eq!(encode_steps(&[1]).unwrap(), [0, 0, 0, 0, 0, 0, 0, 0x01]);
        assert_eq!(encode_steps(&[8]).unwrap(), [0, 0, 0, 0, 0, 0, 0, 0x80]);
        assert_eq!(encode_steps(&[9]).unwrap(), [0, 0, 0, 0, 0, 0, 0x01, 0]);
        assert_eq!(encode_steps(&[16]).unwrap(), [0, 0, 0, 0, 0, 0, 0x80, 0]);
    }

    #[test]
    fn later_pages_move_forward() {
        assert_eq!(mask_position(17).unwrap(), (5, 0));
        assert_eq!(mask_position(25).unwrap(), (4, 0));
        assert_eq!(mask_position(33).unwrap(), (3, 0));
        assert_eq!(mask_position(41).unwrap(), (2, 0));
        assert_eq!(mask_position(49).unwrap(), (1, 0));
        assert_eq!(mask_position(64).unwrap(), (0, 7));
    }

    #[test]
    fn every_step_has_a_unique_bit() {
        let mut seen = [0u8; MASK_SIZE];
        for step in 1..=64 {
            let (byte, bit) = mask_position(step).unwrap();
            assert_eq!(seen[byte] & (1 << bit), 0);
            seen[byte] |= 1 << bit;
        }
        assert_eq!(seen, [0xFF; MASK_SIZE]);
    }

    #[test]
    fn round_trip_sample_sets() {
        let sets: [&[u8]; 4] = [&[], &[1, 5, 9, 13], &[16, 17, 32, 33, 48, 49, 64], &[2, 3, 40, 63]];
        for steps in sets {
            let set = StepSet::from_steps(steps.iter().copied()).unwrap();
            assert_eq!(decode_mask(&encode_mask(set)), set);
        }
        assert_eq!(decode_mask(&encode_mask(StepSet::all())), StepSet::all());
    }

    #[test]
    fn round_trip_generated_sets() {
        // xorshift64
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        for _ in 0..4096 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            for bits in [state, state & state.rotate_left(11), state | state.rotate_right(29)] {
                let set = StepSet::from_bits(bits);
                let mask = encode_mask(set);
                assert_eq!(decode_mask(&mask), set, "bits {bits:#018x}");
                assert_eq!(encode_steps(&set.to_vec()), Ok(mask));
            }
        }
    }

    #[test]
    fn rejects_step_zero_and_65() {
        assert!(encode_steps(&[0]).is_err());
        assert!(encode_steps(&[65]).is_err());
        assert!(mask_position(65).is_err());
    }
}
