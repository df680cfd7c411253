//! Clock configuration type definitions

use heapless::Vec;

use crate::clock::ClockFormat;
use crate::frame::{
    PinMap, PinMapError, IV21_DIGIT_PINS, IV21_SEGMENT_PINS, MAX_DIGITS, MAX_SEGMENTS,
};
use crate::mode::FlashConfig;
use crate::mux::DEFAULT_REFRESH_US;
use crate::regulator::RegulatorConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Multiplex timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RefreshConfig {
    /// Time each digit stays lit (µs)
    pub digit_us: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            digit_us: DEFAULT_REFRESH_US,
        }
    }
}

/// Complete clock configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// Driver outputs wired to digit grids, physical order
    pub digit_pins: Vec<u8, MAX_DIGITS>,
    /// Driver outputs wired to segments A-G then DP
    pub segment_pins: Vec<u8, MAX_SEGMENTS>,
    /// Multiplex timing
    pub refresh: RefreshConfig,
    /// Flash message timing
    pub flash: FlashConfig,
    /// Boost regulator
    pub regulator: RegulatorConfig,
    /// Clock text options
    pub format: ClockFormat,
}

impl ClockConfig {
    /// IV-21 tube on the MAX6921 board
    pub fn iv21() -> Self {
        Self {
            digit_pins: Vec::from_slice(&IV21_DIGIT_PINS).unwrap_or_default(),
            segment_pins: Vec::from_slice(&IV21_SEGMENT_PINS).unwrap_or_default(),
            refresh: RefreshConfig::default(),
            flash: FlashConfig::default(),
            regulator: RegulatorConfig::default(),
            format: ClockFormat::default(),
        }
    }

    /// Build the pin map described by this config
    pub fn pin_map(&self) -> Result<PinMap, PinMapError> {
        PinMap::new(&self.digit_pins, &self.segment_pins)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::iv21()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iv21_defaults() {
        let config = ClockConfig::default();
        assert_eq!(config.pin_map().unwrap(), PinMap::iv21());
        assert_eq!(config.refresh.digit_us, 1000);
        assert_eq!(config.regulator.target_mv, 30_000);
        assert_eq!(config.flash.min_interval_ms, 7000);
        assert!(!config.format.dst);
    }

    #[test]
    fn test_bad_pins_reported() {
        let mut config = ClockConfig::iv21();
        config.segment_pins[0] = config.digit_pins[0];
        assert_eq!(
            config.pin_map(),
            Err(PinMapError::DuplicateOutput(config.digit_pins[0]))
        );
    }
}
