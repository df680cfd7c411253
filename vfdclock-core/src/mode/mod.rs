//! Display-mode selection
//!
//! - [`machine`]: base content and the flash/glitch cycle
//! - [`glitch`]: noise text and the flash message table

pub mod glitch;
pub mod machine;

pub use glitch::{glitch_text, pick_message, MESSAGES};
pub use machine::{FlashConfig, ModeMachine, Phase};
