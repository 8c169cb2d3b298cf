//! Additive-feedback generator behind uClibc/glibc `random_r(3)`.
//!
//! # Modes
//! `Type0` is a plain 31-bit linear congruential generator.  Every other type
//! is a trinomial generator over a table of `degree` 32-bit words: each step
//! adds the word at the rear index into the word at the front index and
//! returns the sum without its low bit.
//!
//! | Type | Trinomial          | Degree | Separation |
//! |------|--------------------|--------|------------|
//! | 0    | linear congruential| 0      | 0          |
//! | 1    | x^7 + x^3 + 1      | 7      | 3          |
//! | 2    | x^15 + x + 1       | 15     | 1          |
//! | 3    | x^31 + x^3 + 1     | 31     | 3          |
//! | 4    | x^63 + x + 1       | 63     | 1          |
//!
//! `rand()` on the affected firmware uses `Type3`.
//!
//! # Seeding
//! The table is filled from the seed with the Park-Miller "minimal standard"
//! recurrence `16807 * x mod (2^31 - 1)`, evaluated with Schrage's split so no
//! intermediate leaves 31 bits.  The indices start `separation` apart and the
//! generator is then stepped `degree * 10` times with the output discarded.
//! Any deviation here changes every keystream word that follows.

use thiserror::Error;

use super::Keystream;

/// Largest supported table (`Type4`).
pub const MAX_DEGREE: usize = 63;

const LCG_MULTIPLIER: i32 = 1_103_515_245;
const LCG_INCREMENT:  i32 = 12_345;

const PM_MODULUS:  i32 = 2_147_483_647;
const PM_QUOTIENT: i32 = 127_773;
const PM_MULT_LO:  i32 = 16_807;
const PM_MULT_HI:  i32 = 2_836;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Unsupported generator configuration (degree {degree}, separation {separation})")]
    InvalidMode { degree: usize, separation: usize },
}

/// The five generator configurations `random_r(3)` knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorType {
    Type0,
    Type1,
    Type2,
    Type3,
    Type4,
}

impl GeneratorType {
    pub const ALL: [GeneratorType; 5] = [
        GeneratorType::Type0,
        GeneratorType::Type1,
        GeneratorType::Type2,
        GeneratorType::Type3,
        GeneratorType::Type4,
    ];

    #[inline]
    pub fn degree(self) -> usize {
        match self {
            GeneratorType::Type0 => 0,
            GeneratorType::Type1 => 7,
            GeneratorType::Type2 => 15,
            GeneratorType::Type3 => 31,
            GeneratorType::Type4 => 63,
        }
    }

    #[inline]
    pub fn separation(self) -> usize {
        match self {
            GeneratorType::Type0 => 0,
            GeneratorType::Type1 => 3,
            GeneratorType::Type2 => 1,
            GeneratorType::Type3 => 3,
            GeneratorType::Type4 => 1,
        }
    }

    /// Resolve a raw `(degree, separation)` pair.
    pub fn from_params(degree: usize, separation: usize) -> Result<Self, GeneratorError> {
        Self::ALL
            .into_iter()
            .find(|t| t.degree() == degree && t.separation() == separation)
            .ok_or(GeneratorError::InvalidMode { degree, separation })
    }
}

/// Generator state.  One instance per seed; never shared between decodes.
#[derive(Debug, Clone)]
pub enum RandomData {
    Linear {
        state: i32,
    },
    Trinomial {
        ty:    GeneratorType,
        state: [i32; MAX_DEGREE],
        front: usize,
        rear:  usize,
    },
}

impl RandomData {
    /// Seed the default `rand()` generator (`Type3`).
    pub fn seed(seed: u32) -> Self {
        Self::with_type(GeneratorType::Type3, seed)
    }

    /// Seed a generator given as a raw degree/separation pair.
    pub fn with_params(degree: usize, separation: usize, seed: u32) -> Result<Self, GeneratorError> {
        Ok(Self::with_type(GeneratorType::from_params(degree, separation)?, seed))
    }

    pub fn with_type(ty: GeneratorType, seed: u32) -> Self {
        // The generator is undefined at zero.
        let seed = if seed == 0 { 1 } else { seed };

        if ty == GeneratorType::Type0 {
            return RandomData::Linear { state: seed as i32 };
        }

        let degree = ty.degree();

        // 32-bit signed throughout: seeds with the top bit set start negative.
        // hi and lo share a sign, so neither product nor their difference
        // leaves i32.
        let mut state = [0i32; MAX_DEGREE];
        let mut word = seed as i32;
        state[0] = word;
        for slot in state.iter_mut().take(degree).skip(1) {
            let hi = word / PM_QUOTIENT;
            let lo = word % PM_QUOTIENT;
            word = PM_MULT_LO * lo - PM_MULT_HI * hi;
            if word < 0 {
                word += PM_MODULUS;
            }
            *slot = word;
        }

        let mut rd = RandomData::Trinomial {
            ty,
            state,
            front: ty.separation(),
            rear: 0,
        };
        for _ in 0..degree * 10 {
            rd.next_i32();
        }
        rd
    }

    /// Advance once and return a 31-bit value (top bit always clear).
    pub fn next_i32(&mut self) -> i32 {
        match self {
            RandomData::Linear { state } => {
                *state = state
                    .wrapping_mul(LCG_MULTIPLIER)
                    .wrapping_add(LCG_INCREMENT)
                    & 0x7fff_ffff;
                *state
            }
            RandomData::Trinomial { ty, state, front, rear } => {
                let degree = ty.degree();
                let val = state[*front].wrapping_add(state[*rear]);
                state[*front] = val;
                let result = (val >> 1) & 0x7fff_ffff;

                // Front and rear can never wrap on the same step.
                *front += 1;
                if *front >= degree {
                    *front = 0;
                    *rear += 1;
                } else {
                    *rear += 1;
                    if *rear >= degree {
                        *rear = 0;
                    }
                }
                result
            }
        }
    }

    /// Current `(front, rear)` indices, `None` in linear mode.
    pub fn indices(&self) -> Option<(usize, usize)> {
        match self {
            RandomData::Linear { .. } => None,
            RandomData::Trinomial { front, rear, .. } => Some((*front, *rear)),
        }
    }

    pub fn generator_type(&self) -> GeneratorType {
        match self {
            RandomData::Linear { .. } => GeneratorType::Type0,
            RandomData::Trinomial { ty, .. } => *ty,
        }
    }
}

impl Keystream for RandomData {
    #[inline]
    fn next_word(&mut self) -> u32 {
        self.next_i32() as u32
    }
}
