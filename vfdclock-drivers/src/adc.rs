//! MCP3221 12-bit I2C ADC
//!
//! Single-channel successive-approximation ADC whose reference is its own
//! supply. A conversion is started by addressing the part for a read, and
//! the result comes back as two bytes with the upper nibble zero.

use embedded_hal::i2c::I2c;
use vfdclock_core::traits::{SensorError, VoltageSensor};

/// Full-scale code count (12 bits)
const FULL_SCALE: u32 = 4096;

/// MCP3221 on an I2C bus
pub struct Mcp3221<I2C> {
    i2c: I2C,
    address: u8,
    vref_mv: u32,
    samples: u8,
}

impl<I2C, E> Mcp3221<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Create a driver for the part at `address` with the given supply (mV)
    pub fn new(i2c: I2C, address: u8, vref_mv: u32) -> Self {
        Self {
            i2c,
            address,
            vref_mv,
            samples: 1,
        }
    }

    /// Average this many conversions per millivolt reading (minimum 1)
    pub fn with_samples(mut self, samples: u8) -> Self {
        self.samples = samples.max(1);
        self
    }

    /// I2C address in use
    pub fn address(&self) -> u8 {
        self.address
    }

    /// One raw 12-bit conversion
    pub fn read_raw(&mut self) -> Result<u16, E> {
        let mut buf = [0u8; 2];
        self.i2c.read(self.address, &mut buf)?;
        Ok(u16::from_be_bytes(buf) & 0x0FFF)
    }

    /// Mean of `samples` raw conversions
    pub fn read_average_raw(&mut self, samples: u8) -> Result<u16, E> {
        let samples = samples.max(1);
        let mut sum = 0u32;
        for _ in 0..samples {
            sum += u32::from(self.read_raw()?);
        }
        Ok((sum / u32::from(samples)) as u16)
    }

    /// Convert a raw code to millivolts
    pub fn raw_to_millivolts(&self, raw: u16) -> u32 {
        u32::from(raw) * self.vref_mv / FULL_SCALE
    }
}

impl<I2C, E> VoltageSensor for Mcp3221<I2C>
where
    I2C: I2c<Error = E>,
{
    fn read_millivolts(&mut self) -> Result<u32, SensorError> {
        let raw = self
            .read_average_raw(self.samples)
            .map_err(|_| SensorError::Bus)?;
        Ok(self.raw_to_millivolts(raw))
    }

    /// A conversion read doubles as the presence check. Zero-length writes
    /// are refused by some HALs before the bus is touched.
    fn is_connected(&mut self) -> bool {
        self.read_raw().is_ok()
    }
}
