//! Completion checksum over the decrypted payload.
//!
//! The encoder picks `crc` so that `crc + Σ words == 0xFFFFFFFF` modulo 2^32.
//! A wrong seed or a damaged file breaks the sum.

use byteorder::{ByteOrder, LittleEndian};

use crate::header::WORD_SIZE;

/// Expected total of checksum plus every payload word.
pub const COMPLETE_SUM: u32 = 0xffff_ffff;

fn word_sum(payload: &[u8]) -> u32 {
    payload
        .chunks_exact(WORD_SIZE)
        .map(LittleEndian::read_u32)
        .fold(0u32, u32::wrapping_add)
}

/// True when `stored` completes the payload's word sum.
pub fn validate(payload: &[u8], stored: u32) -> bool {
    stored.wrapping_add(word_sum(payload)) == COMPLETE_SUM
}

/// The checksum value a valid header must carry for `payload`.
pub fn completion_checksum(payload: &[u8]) -> u32 {
    COMPLETE_SUM.wrapping_sub(word_sum(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_payload() {
        assert_eq!(completion_checksum(b"A=1\0B=2\0"), 0xff9c_857c);
        assert!(validate(b"A=1\0B=2\0", 0xff9c_857c));
        assert!(!validate(b"A=1\0B=2\0", 0xff9c_857d));
    }

    #[test]
    fn sum_wraps() {
        let payload = [0xff; 8];
        // 0xffffffff * 2 wraps to 0xfffffffe.
        assert_eq!(completion_checksum(&payload), 1);
        assert!(validate(&payload, 1));
    }

    proptest! {
        #[test]
        fn completion_law(words in proptest::collection::vec(any::<u32>(), 1..128)) {
            let mut payload = vec![0u8; words.len() * 4];
            LittleEndian::write_u32_into(&words, &mut payload);
            prop_assert!(validate(&payload, completion_checksum(&payload)));
        }

        #[test]
        fn any_single_bit_flip_is_detected(
            words in proptest::collection::vec(any::<u32>(), 1..128),
            pick in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut payload = vec![0u8; words.len() * 4];
            LittleEndian::write_u32_into(&words, &mut payload);
            let crc = completion_checksum(&payload);

            let i = pick.index(payload.len());
            payload[i] ^= 1 << bit;
            prop_assert!(!validate(&payload, crc));
        }
    }
}
