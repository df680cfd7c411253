//! Shift-register driver trait for the VFD tube

use crate::frame::Frame;

/// Sends packed frames to the tube driver IC
///
/// Implementations must latch all 24 outputs at once (shift the whole frame,
/// then pulse the load line) so that two digit grids are never observed
/// active together. `transmit` must complete before it returns; the
/// multiplexer calls it at most once per refresh quantum.
pub trait FrameTransmitter {
    /// Error type of the underlying bus
    type Error;

    /// Shift out and latch one frame
    fn transmit(&mut self, frame: Frame) -> Result<(), Self::Error>;

    /// Drive every output inactive
    fn clear(&mut self) -> Result<(), Self::Error> {
        self.transmit(Frame::EMPTY)
    }
}
