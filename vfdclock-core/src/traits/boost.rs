//! Boost converter feedback and drive traits

/// Errors that can occur with voltage sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC did not acknowledge on the bus
    NotConnected,
    /// Bus transfer failed mid-read
    Bus,
}

/// Trait for the boost feedback ADC
///
/// Readings are taken at the ADC pin, i.e. after the external divider.
/// Scaling back to the boost rail is the regulator's job.
pub trait VoltageSensor {
    /// Read the voltage at the ADC input in millivolts
    ///
    /// Takes `&mut self` because bus reads require mutable access.
    fn read_millivolts(&mut self) -> Result<u32, SensorError>;

    /// Probe whether the ADC is present on the bus
    fn is_connected(&mut self) -> bool;
}

/// Trait for the boost converter PWM output
pub trait DutyOutput {
    /// Apply a raw duty value (0-255 for the 8-bit boost PWM)
    fn set_duty(&mut self, duty: u16);
}
