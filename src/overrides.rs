//! Devices whose header states a magic that is not the real seed.

use crate::rng::RngKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Override {
    pub stated_magic: u32,
    pub real_magic:   u32,
    pub rng:          RngKind,
}

static OVERRIDES: &[Override] = &[
    // RBR760
    Override { stated_magic: 0x0134_6231, real_magic: 0x0134_6232, rng: RngKind::Musl },
    // RAX10: glibc on the device, but its random_r matches uClibc's.
    Override { stated_magic: 0x2020_0425, real_magic: 0x2020_0426, rng: RngKind::Uclibc },
];

pub fn lookup(stated_magic: u32) -> Option<&'static Override> {
    OVERRIDES.iter().find(|o| o.stated_magic == stated_magic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_devices() {
        let o = lookup(0x0134_6231).unwrap();
        assert_eq!(o.real_magic, 0x0134_6232);
        assert_eq!(o.rng, RngKind::Musl);
        assert_eq!(lookup(0x2020_0425).unwrap().rng, RngKind::Uclibc);
        assert!(lookup(0x2013_1224).is_none());
    }

    #[test]
    fn stated_magics_are_unique() {
        for (i, a) in OVERRIDES.iter().enumerate() {
            assert!(OVERRIDES[i + 1..].iter().all(|b| b.stated_magic != a.stated_magic));
        }
    }
}
