//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in vfdclock-core on top of `embedded-hal` 1.0 buses and pins:
//!
//! - MAX6921 VFD shift register (SPI plus a LOAD pin)
//! - MCP3221 12-bit I2C ADC for boost feedback
//! - PWM duty output for the boost switch

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod display;
pub mod pwm;

pub use adc::Mcp3221;
pub use display::{Max6921, Max6921Error};
pub use pwm::PwmDuty;
