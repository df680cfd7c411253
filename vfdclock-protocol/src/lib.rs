//! Serial Control-Surface Protocol
//!
//! This crate defines the UART protocol between a host (a PC, a companion
//! network module, a test harness) and the clock. It replaces a web control
//! page with the same handful of operations: pick the base display mode,
//! enable or disable flash messages, set the custom text, set the wall-clock
//! time, and query status.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–64B       │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The clock never initiates traffic. Every host command is answered with an
//! ACK, a NAK, or (for status queries) a status report.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;
pub mod mode;

pub use frame::{
    Frame, FrameError, FrameParser, WireBytes, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE,
};
pub use messages::{ClockReport, HostCommand, NakReason, StatusReport, WireTime};
pub use mode::{BaseMode, PhaseReport};
