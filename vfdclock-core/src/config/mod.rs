//! Configuration types
//!
//! Board-agnostic settings for rendering and regulation, plus the few
//! hardware constants the drivers need. Everything defaults to the IV-21
//! tube on the MAX6921 adapter board.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
