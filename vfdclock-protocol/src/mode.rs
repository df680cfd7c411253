//! Display mode values shared over the wire

use serde::{Deserialize, Serialize};

/// Base content source shown when no flash message is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaseMode {
    /// Wall-clock time
    #[default]
    Clock,
    /// User-supplied text
    CustomText,
}

// Wire format values
const MODE_CLOCK: u8 = 0x00;
const MODE_CUSTOM_TEXT: u8 = 0x01;

impl BaseMode {
    /// Parse a mode from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            MODE_CLOCK => Some(BaseMode::Clock),
            MODE_CUSTOM_TEXT => Some(BaseMode::CustomText),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            BaseMode::Clock => MODE_CLOCK,
            BaseMode::CustomText => MODE_CUSTOM_TEXT,
        }
    }

    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            BaseMode::Clock => BaseMode::CustomText,
            BaseMode::CustomText => BaseMode::Clock,
        }
    }
}

/// Phase of the display-mode state machine as reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseReport {
    Base,
    GlitchIn,
    Flashing,
    GlitchOut,
}
