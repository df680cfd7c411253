//! User-facing display settings
//!
//! The control surface never touches the display buffer directly. Commands
//! are queued and applied here at the start of a control-loop pass, and the
//! mode machine reads the result.

use vfdclock_protocol::{BaseMode, HostCommand, WireTime};

use crate::buffer::DisplayText;
use crate::frame::MAX_DIGITS;
use crate::segment::is_supported;

/// Custom text shown until the user sets their own
pub const DEFAULT_CUSTOM_TEXT: &str = "HELLO";

/// What the control loop must do after a command is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// Inputs updated, nothing else to do
    Updated,
    /// Set the wall clock to this time
    SetTime(WireTime),
    /// Reply with a status report
    StatusRequested,
    /// Command refused (e.g. an impossible date)
    Rejected,
}

/// Current control-surface settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlInputs {
    width: usize,
    base_mode: BaseMode,
    flash_enabled: bool,
    custom_text: DisplayText,
}

impl ControlInputs {
    /// Settings at power-on for a display `width` positions wide
    pub fn new(width: usize) -> Self {
        let mut inputs = Self {
            width: width.min(MAX_DIGITS),
            base_mode: BaseMode::Clock,
            flash_enabled: true,
            custom_text: DisplayText::new(),
        };
        inputs.set_custom_text(DEFAULT_CUSTOM_TEXT);
        inputs
    }

    /// Selected base content
    pub fn base_mode(&self) -> BaseMode {
        self.base_mode
    }

    /// Select base content
    pub fn set_base_mode(&mut self, mode: BaseMode) {
        self.base_mode = mode;
    }

    /// Whether flash messages are enabled
    pub fn flash_enabled(&self) -> bool {
        self.flash_enabled
    }

    /// Enable or disable flash messages
    pub fn set_flash_enabled(&mut self, enabled: bool) {
        self.flash_enabled = enabled;
    }

    /// Custom text, always exactly `width` characters
    pub fn custom_text(&self) -> &str {
        &self.custom_text
    }

    /// Replace the custom text
    ///
    /// Longer text is cut to the display width, shorter text is padded with
    /// spaces. Symbols the tube cannot show are stored as spaces, so the
    /// text is plain ASCII and always fits.
    pub fn set_custom_text(&mut self, text: &str) {
        self.custom_text.clear();
        let shown = text
            .chars()
            .map(|symbol| if is_supported(symbol) { symbol } else { ' ' })
            .chain(core::iter::repeat(' '))
            .take(self.width);
        for symbol in shown {
            let _ = self.custom_text.push(symbol);
        }
    }

    /// Apply a host command
    pub fn apply(&mut self, command: &HostCommand<'_>) -> CommandOutcome {
        match *command {
            HostCommand::SetBaseMode(mode) => self.base_mode = mode,
            HostCommand::ToggleBaseMode => self.base_mode = self.base_mode.toggled(),
            HostCommand::SetFlashMessages(enabled) => self.flash_enabled = enabled,
            HostCommand::ToggleFlashMessages => self.flash_enabled = !self.flash_enabled,
            HostCommand::SetText(text) => self.set_custom_text(text),
            HostCommand::SetTime(time) => {
                return if time.is_valid() {
                    CommandOutcome::SetTime(time)
                } else {
                    CommandOutcome::Rejected
                };
            }
            HostCommand::QueryStatus => return CommandOutcome::StatusRequested,
        }
        CommandOutcome::Updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_defaults() {
        let inputs = ControlInputs::new(8);
        assert_eq!(inputs.base_mode(), BaseMode::Clock);
        assert!(inputs.flash_enabled());
        assert_eq!(inputs.custom_text(), "HELLO   ");
    }

    #[test]
    fn test_custom_text_pad_and_truncate() {
        let mut inputs = ControlInputs::new(8);
        inputs.set_custom_text("");
        assert_eq!(inputs.custom_text(), "        ");
        inputs.set_custom_text("ABCDEFGHIJ");
        assert_eq!(inputs.custom_text(), "ABCDEFGH");
        inputs.set_custom_text("ÄB");
        assert_eq!(inputs.custom_text(), " B      ");
    }

    #[test]
    fn test_wide_characters_keep_width() {
        let mut inputs = ControlInputs::new(8);
        inputs.set_custom_text("𝄞𝄞𝄞𝄞𝄞𝄞𝄞");
        assert_eq!(inputs.custom_text().chars().count(), 8);
        assert_eq!(inputs.custom_text(), "        ");

        let mut wide = ControlInputs::new(MAX_DIGITS);
        wide.set_custom_text("€1.2€3€4€5€6€7€8");
        assert_eq!(wide.custom_text().chars().count(), MAX_DIGITS);
        assert_eq!(wide.custom_text(), " 1.2 3 4 5 6");
    }

    #[test]
    fn test_toggles() {
        let mut inputs = ControlInputs::new(8);
        assert_eq!(
            inputs.apply(&HostCommand::ToggleBaseMode),
            CommandOutcome::Updated
        );
        assert_eq!(inputs.base_mode(), BaseMode::CustomText);
        inputs.apply(&HostCommand::ToggleFlashMessages);
        assert!(!inputs.flash_enabled());
        inputs.apply(&HostCommand::SetFlashMessages(true));
        assert!(inputs.flash_enabled());
        inputs.apply(&HostCommand::SetBaseMode(BaseMode::Clock));
        assert_eq!(inputs.base_mode(), BaseMode::Clock);
    }

    #[test]
    fn test_set_text_command() {
        let mut inputs = ControlInputs::new(4);
        inputs.apply(&HostCommand::SetText("LONG TEXT"));
        assert_eq!(inputs.custom_text(), "LONG");
    }

    #[test]
    fn test_set_time_validated() {
        let mut inputs = ControlInputs::new(8);
        let good = WireTime {
            year: 2024,
            month: 5,
            day: 1,
            hour: 12,
            minute: 0,
            second: 0,
        };
        assert_eq!(
            inputs.apply(&HostCommand::SetTime(good)),
            CommandOutcome::SetTime(good)
        );

        let bad = WireTime { hour: 24, ..good };
        assert_eq!(
            inputs.apply(&HostCommand::SetTime(bad)),
            CommandOutcome::Rejected
        );
    }

    #[test]
    fn test_query_status() {
        let mut inputs = ControlInputs::new(8);
        assert_eq!(
            inputs.apply(&HostCommand::QueryStatus),
            CommandOutcome::StatusRequested
        );
    }
}
