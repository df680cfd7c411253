//! Board hardware constants

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Boost feedback ADC and PWM settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoostHardware {
    /// 7-bit I2C address of the MCP3221
    pub adc_address: u8,
    /// ADC reference (mV); the MCP3221 uses its supply
    pub adc_vref_mv: u32,
    /// Readings averaged per sample
    pub adc_samples: u8,
    /// Boost switch PWM frequency (Hz)
    pub pwm_frequency_hz: u32,
}

impl Default for BoostHardware {
    fn default() -> Self {
        Self {
            // MCP3221A6
            adc_address: 0x4E,
            adc_vref_mv: 3300,
            adc_samples: 1,
            pwm_frequency_hz: 25_000,
        }
    }
}

/// Indicator LED lit while the firmware is booting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndicatorHardware {
    /// LED PWM frequency (Hz)
    pub pwm_frequency_hz: u32,
    /// Brightness during boot, out of [`crate::regulator::PWM_RANGE`]
    pub boot_duty: u16,
}

impl Default for IndicatorHardware {
    fn default() -> Self {
        Self {
            pwm_frequency_hz: 5_000,
            boot_duty: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regulator::PWM_RANGE;

    #[test]
    fn test_boot_indicator_is_dim() {
        let indicator = IndicatorHardware::default();
        assert_eq!(indicator.pwm_frequency_hz, 5_000);
        assert!(indicator.boot_duty > 0);
        assert!(indicator.boot_duty < PWM_RANGE / 16);
    }
}
