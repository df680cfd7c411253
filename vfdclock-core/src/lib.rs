//! Board-agnostic core logic for the VFD tube clock firmware
//!
//! This crate contains all rendering and regulation logic that does not
//! depend on specific hardware implementations:
//!
//! - Hardware abstraction traits (shift register, ADC, PWM, wall clock)
//! - Segment encoding and MAX6921 frame packing
//! - Display buffer and digit multiplexer
//! - Display-mode state machine with flash messages and glitch effects
//! - Boost converter voltage regulator
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod buffer;
pub mod clock;
pub mod config;
pub mod control;
pub mod engine;
pub mod frame;
pub mod mode;
pub mod mux;
pub mod random;
pub mod regulator;
pub mod segment;
pub mod traits;

pub use buffer::{Cell, DisplayBuffer, DisplayText};
pub use clock::{ClockFormat, WallTime};
pub use config::ClockConfig;
pub use control::{CommandOutcome, ControlInputs};
pub use engine::{ClockEngine, PassReport};
pub use frame::{Frame, PinMap, PinMapError};
pub use mode::{FlashConfig, ModeMachine, Phase};
pub use mux::Multiplexer;
pub use random::XorShift32;
pub use regulator::{Regulator, RegulatorConfig, RegulatorSample, RegulatorTick};
