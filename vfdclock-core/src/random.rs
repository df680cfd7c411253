//! Small xorshift generator for display effects
//!
//! Flash timing and glitch text only need to look irregular, so a 32-bit
//! xorshift seeded from boot-time entropy is plenty.

use crate::traits::RandomSource;

/// Marsaglia xorshift32
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Fallback seed; xorshift has a fixed point at zero
    const ZERO_SEED: u32 = 0x9E37_79B9;

    /// Create a generator from a seed
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { Self::ZERO_SEED } else { seed },
        }
    }
}

impl RandomSource for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}
