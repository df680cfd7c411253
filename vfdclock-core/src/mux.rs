//! Digit multiplexer
//!
//! Lights one digit per refresh quantum and walks through every position in
//! turn. Persistence of vision does the rest.

use crate::buffer::DisplayBuffer;
use crate::frame::{Frame, PinMap};
use crate::traits::FrameTransmitter;

/// Default time each digit stays lit (µs)
pub const DEFAULT_REFRESH_US: u64 = 1000;

/// Refresh scheduler for the display
#[derive(Debug, Clone)]
pub struct Multiplexer {
    refresh_us: u64,
    current: usize,
    last_advance_us: Option<u64>,
}

impl Default for Multiplexer {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_US)
    }
}

impl Multiplexer {
    /// Create a multiplexer with the given per-digit period
    pub const fn new(refresh_us: u64) -> Self {
        Self {
            refresh_us,
            current: 0,
            last_advance_us: None,
        }
    }

    /// Position that the next frame will light
    pub fn current_digit(&self) -> usize {
        self.current
    }

    /// Light the next digit if the refresh quantum has elapsed
    ///
    /// Returns the transmitted frame, or `None` when it was not yet time.
    /// A transmit failure still advances to the next digit so one bad write
    /// cannot stall the scan.
    pub fn poll<T: FrameTransmitter>(
        &mut self,
        now_us: u64,
        buffer: &DisplayBuffer,
        pins: &PinMap,
        transmitter: &mut T,
    ) -> Result<Option<Frame>, T::Error> {
        if let Some(last) = self.last_advance_us {
            if now_us.saturating_sub(last) < self.refresh_us {
                return Ok(None);
            }
        }

        let width = buffer.width();
        if width == 0 {
            return Ok(None);
        }

        let digit = self.current % width;
        let segments = buffer.cell(digit).map(|cell| cell.segments()).unwrap_or(0);
        let frame = pins.pack(digit, segments);

        self.current = (digit + 1) % width;
        self.last_advance_us = Some(now_us);

        transmitter.transmit(frame)?;
        Ok(Some(frame))
    }
}
