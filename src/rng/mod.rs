//! Keystream generators.
//!
//! Firmware builds link against either uClibc or musl, and the backup tool
//! XORs the payload with whatever `rand()` their libc provides.  Both are
//! reproduced here bit-for-bit:
//!
//! - [`RngKind::Uclibc`]: the `Type3` trinomial generator in [`random_r`].
//! - [`RngKind::Musl`]: the 64-bit LCG in [`musl`].
//!
//! Generators are plain owned values.  Seed one per decode attempt and hand it
//! to [`crate::cipher::apply_keystream`] by `&mut`.

pub mod musl;
pub mod random_r;

use serde::{Deserialize, Serialize};

pub use musl::MuslRand;
pub use random_r::{GeneratorError, GeneratorType, RandomData};

// ── Keystream trait ──────────────────────────────────────────────────────────

/// A source of 32-bit keystream words, one per payload word.
pub trait Keystream {
    fn next_word(&mut self) -> u32;
}

impl<K: Keystream + ?Sized> Keystream for Box<K> {
    #[inline]
    fn next_word(&mut self) -> u32 {
        (**self).next_word()
    }
}

// ── RngKind ──────────────────────────────────────────────────────────────────

/// Which libc `rand()` encrypted the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RngKind {
    Uclibc,
    Musl,
}

impl RngKind {
    /// Order in which auto-detection tries the generators.
    pub const PROBE_ORDER: [RngKind; 2] = [RngKind::Musl, RngKind::Uclibc];

    pub fn name(self) -> &'static str {
        match self {
            RngKind::Uclibc => "uclibc",
            RngKind::Musl   => "musl",
        }
    }

    /// Parse from a CLI string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uclibc" => Some(RngKind::Uclibc),
            "musl"   => Some(RngKind::Musl),
            _        => None,
        }
    }
}

impl std::fmt::Display for RngKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Factory ──────────────────────────────────────────────────────────────────

/// Seed a fresh generator of the given kind.
pub fn get_rng(kind: RngKind, seed: u32) -> Box<dyn Keystream> {
    match kind {
        RngKind::Uclibc => Box::new(RandomData::seed(seed)),
        RngKind::Musl   => Box::new(MuslRand::seed(seed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in RngKind::PROBE_ORDER {
            assert_eq!(RngKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(RngKind::from_name("MUSL"), Some(RngKind::Musl));
        assert_eq!(RngKind::from_name("glibc"), None);
    }

    #[test]
    fn factory_dispatches_by_kind() {
        let mut u = get_rng(RngKind::Uclibc, 1);
        assert_eq!(u.next_word(), 1804289383);
        let mut m = get_rng(RngKind::Musl, 1);
        assert_eq!(m.next_word(), 0);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RngKind::Uclibc).unwrap(), "\"uclibc\"");
        let k: RngKind = serde_json::from_str("\"musl\"").unwrap();
        assert_eq!(k, RngKind::Musl);
    }
}
