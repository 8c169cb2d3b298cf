//! Word-wise XOR with a generator keystream.
//!
//! The payload is a sequence of little-endian 32-bit words.  Word `n` is XORed
//! with the `n`-th generator output, so the generator must be advanced exactly
//! once per word in increasing offset order.  The same call both encrypts and
//! decrypts.

use byteorder::{ByteOrder, LittleEndian};

use crate::header::WORD_SIZE;
use crate::rng::Keystream;

/// XOR `payload` in place.  Bytes past the last whole word are left as-is.
pub fn apply_keystream<K: Keystream + ?Sized>(payload: &mut [u8], ks: &mut K) {
    for word in payload.chunks_exact_mut(WORD_SIZE) {
        let plain = LittleEndian::read_u32(word) ^ ks.next_word();
        LittleEndian::write_u32(word, plain);
    }
}
