//! Hardware abstraction traits
//!
//! These traits define the interface between the rendering/regulation
//! logic and hardware-specific implementations.

pub mod boost;
pub mod display;
pub mod time;

pub use boost::{DutyOutput, SensorError, VoltageSensor};
pub use display::FrameTransmitter;
pub use time::{RandomSource, WallClock};
