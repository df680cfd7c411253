//! Wall-clock and randomness sources

use crate::clock::WallTime;

/// Source of local calendar time for clock mode
pub trait WallClock {
    /// Current local time, or `None` until the clock has been set
    fn now(&mut self) -> Option<WallTime>;
}

/// Pseudo-random number source for flash scheduling and glitch text
pub trait RandomSource {
    /// Next 32 random bits
    fn next_u32(&mut self) -> u32;

    /// Uniform-ish value in `[low, high)`
    ///
    /// Returns `low` when the range is empty. Modulo bias is irrelevant at
    /// the range sizes used here.
    fn range(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        low + self.next_u32() % (high - low)
    }

    /// True with the given probability in percent
    fn chance_percent(&mut self, percent: u32) -> bool {
        self.range(0, 100) < percent
    }
}
