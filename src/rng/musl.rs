//! musl libc `rand(3)`: a 64-bit LCG that returns the top 31 bits.

use super::Keystream;

const MULTIPLIER: u64 = 6_364_136_223_846_793_005;

#[derive(Debug, Clone)]
pub struct MuslRand {
    state: u64,
}

impl MuslRand {
    pub fn seed(seed: u32) -> Self {
        Self { state: u64::from(seed.wrapping_sub(1)) }
    }

    pub fn next_i32(&mut self) -> i32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(1);
        (self.state >> 33) as i32
    }
}

impl Keystream for MuslRand {
    #[inline]
    fn next_word(&mut self) -> u32 {
        self.next_i32() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_sequences() {
        let mut r = MuslRand::seed(1);
        let got: Vec<i32> = (0..6).map(|_| r.next_i32()).collect();
        assert_eq!(got, [0, 740882966, 1616430695, 1708849955, 1669437588, 406334850]);

        let mut r = MuslRand::seed(0x2013_1224);
        let got: Vec<i32> = (0..6).map(|_| r.next_i32()).collect();
        assert_eq!(got, [1336375369, 1965794539, 568818044, 860724474, 569410537, 429042138]);
    }

    #[test]
    fn zero_seed_wraps() {
        // srand(0) stores u32::MAX, unlike random_r which substitutes 1.
        let mut a = MuslRand::seed(0);
        let mut b = MuslRand { state: u64::from(u32::MAX) };
        assert_eq!(a.next_i32(), b.next_i32());
    }
}
