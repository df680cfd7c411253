//! Display-mode state machine
//!
//! Decides what the display buffer should hold. Most of the time that is
//! the base content (clock or custom text). Every few seconds, when flash
//! messages are enabled in clock mode, it plays a short cycle:
//!
//! ```text
//! Base -> GlitchIn -> Flashing -> GlitchOut -> Base
//! ```
//!
//! The machine never sleeps. Each call to [`ModeMachine::advance`] compares
//! the injected time against its deadlines and returns new content only when
//! the buffer needs rewriting.

use vfdclock_protocol::{BaseMode, PhaseReport};

use super::glitch::{glitch_text, pick_message};
use crate::buffer::DisplayText;
use crate::clock::ClockFormat;
use crate::control::ControlInputs;
use crate::traits::{RandomSource, WallClock};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Flash cycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Showing clock or custom text
    #[default]
    Base,
    /// Noise leading into a message
    GlitchIn,
    /// Message on screen
    Flashing,
    /// Noise leading back to base content
    GlitchOut,
}

impl From<Phase> for PhaseReport {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Base => PhaseReport::Base,
            Phase::GlitchIn => PhaseReport::GlitchIn,
            Phase::Flashing => PhaseReport::Flashing,
            Phase::GlitchOut => PhaseReport::GlitchOut,
        }
    }
}

/// Flash cycle timing (all values in ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlashConfig {
    /// Shortest gap between flashes
    pub min_interval_ms: u32,
    /// Longest gap between flashes (inclusive)
    pub max_interval_ms: u32,
    /// How long a message stays up
    pub flash_ms: u32,
    /// Length of each glitch phase
    pub glitch_ms: u32,
    /// Period of new glitch noise
    pub glitch_frame_ms: u32,
    /// Period of base content rewrites
    pub content_refresh_ms: u32,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 7000,
            max_interval_ms: 15000,
            flash_ms: 500,
            glitch_ms: 400,
            glitch_frame_ms: 50,
            content_refresh_ms: 100,
        }
    }
}

/// Display-mode state machine
#[derive(Debug, Clone)]
pub struct ModeMachine {
    config: FlashConfig,
    format: ClockFormat,
    width: usize,
    phase: Phase,
    /// End of the current non-base phase
    phase_end_ms: u64,
    /// Next glitch frame inside a glitch phase
    next_glitch_ms: u64,
    /// Next flash; `None` while flashing is not eligible
    next_flash_ms: Option<u64>,
    /// Next base content rewrite; `None` forces one immediately
    next_refresh_ms: Option<u64>,
    message: &'static str,
}

impl ModeMachine {
    /// Create a machine for a display `width` positions wide
    pub fn new(config: FlashConfig, format: ClockFormat, width: usize) -> Self {
        Self {
            config,
            format,
            width,
            phase: Phase::Base,
            phase_end_ms: 0,
            next_glitch_ms: 0,
            next_flash_ms: None,
            next_refresh_ms: None,
            message: "",
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Message of the current or most recent flash cycle
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Clock text options
    pub fn format(&self) -> &ClockFormat {
        &self.format
    }

    /// Time of the next scheduled flash
    pub fn next_flash_ms(&self) -> Option<u64> {
        self.next_flash_ms
    }

    /// Schedule the first flash at boot if flashing is enabled
    pub fn start<R: RandomSource>(&mut self, now_ms: u64, inputs: &ControlInputs, rng: &mut R) {
        self.phase = Phase::Base;
        self.next_refresh_ms = None;
        self.next_flash_ms = if Self::flash_eligible(inputs) {
            Some(self.schedule_after(now_ms, rng))
        } else {
            None
        };
    }

    /// Run one step of the machine
    ///
    /// Returns the text to load into the display buffer, or `None` when the
    /// buffer should keep its current content.
    pub fn advance<C, R>(
        &mut self,
        now_ms: u64,
        inputs: &ControlInputs,
        clock: &mut C,
        rng: &mut R,
    ) -> Option<DisplayText>
    where
        C: WallClock,
        R: RandomSource,
    {
        match self.phase {
            Phase::Base => self.advance_base(now_ms, inputs, clock, rng),
            Phase::GlitchIn => {
                if now_ms >= self.phase_end_ms {
                    self.phase = Phase::Flashing;
                    self.phase_end_ms = now_ms + u64::from(self.config.flash_ms);
                    let mut text = DisplayText::new();
                    let _ = text.push_str(self.message);
                    Some(text)
                } else {
                    self.glitch_frame(now_ms, rng)
                }
            }
            Phase::Flashing => {
                if now_ms >= self.phase_end_ms {
                    self.enter_glitch(Phase::GlitchOut, now_ms, rng)
                } else {
                    None
                }
            }
            Phase::GlitchOut => {
                if now_ms >= self.phase_end_ms {
                    self.phase = Phase::Base;
                    self.next_flash_ms = if Self::flash_eligible(inputs) {
                        Some(self.schedule_after(now_ms, rng))
                    } else {
                        None
                    };
                    self.refresh_base(now_ms, inputs, clock)
                } else {
                    self.glitch_frame(now_ms, rng)
                }
            }
        }
    }

    fn advance_base<C, R>(
        &mut self,
        now_ms: u64,
        inputs: &ControlInputs,
        clock: &mut C,
        rng: &mut R,
    ) -> Option<DisplayText>
    where
        C: WallClock,
        R: RandomSource,
    {
        if !Self::flash_eligible(inputs) {
            self.next_flash_ms = None;
        } else {
            let next_flash = match self.next_flash_ms {
                Some(at) => at,
                None => {
                    let at = self.schedule_after(now_ms, rng);
                    self.next_flash_ms = Some(at);
                    at
                }
            };

            if now_ms >= next_flash {
                self.message = pick_message(rng);
                return self.enter_glitch(Phase::GlitchIn, now_ms, rng);
            }
        }

        match self.next_refresh_ms {
            Some(at) if now_ms < at => None,
            _ => self.refresh_base(now_ms, inputs, clock),
        }
    }

    fn refresh_base<C: WallClock>(
        &mut self,
        now_ms: u64,
        inputs: &ControlInputs,
        clock: &mut C,
    ) -> Option<DisplayText> {
        self.next_refresh_ms = Some(now_ms + u64::from(self.config.content_refresh_ms));

        let mut text = DisplayText::new();
        match inputs.base_mode() {
            BaseMode::Clock => {
                let _ = text.push_str(&self.format.render(clock.now()));
            }
            BaseMode::CustomText => {
                let _ = text.push_str(inputs.custom_text());
            }
        }
        Some(text)
    }

    fn enter_glitch<R: RandomSource>(
        &mut self,
        phase: Phase,
        now_ms: u64,
        rng: &mut R,
    ) -> Option<DisplayText> {
        self.phase = phase;
        self.phase_end_ms = now_ms + u64::from(self.config.glitch_ms);
        self.next_glitch_ms = now_ms + u64::from(self.config.glitch_frame_ms);
        Some(glitch_text(rng, self.width))
    }

    fn glitch_frame<R: RandomSource>(&mut self, now_ms: u64, rng: &mut R) -> Option<DisplayText> {
        if now_ms < self.next_glitch_ms {
            return None;
        }
        self.next_glitch_ms = now_ms + u64::from(self.config.glitch_frame_ms);
        Some(glitch_text(rng, self.width))
    }

    fn schedule_after<R: RandomSource>(&self, now_ms: u64, rng: &mut R) -> u64 {
        let delay = rng.range(
            self.config.min_interval_ms,
            self.config.max_interval_ms.saturating_add(1),
        );
        now_ms + u64::from(delay)
    }

    fn flash_eligible(inputs: &ControlInputs) -> bool {
        inputs.flash_enabled() && inputs.base_mode() == BaseMode::Clock
    }
}
