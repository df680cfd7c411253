//! Message types for the control-surface protocol
//!
//! Message types are divided into two categories:
//! - Host → Clock: mode selection, text, time, status queries
//! - Clock → Host: acknowledgements and status reports

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::mode::{BaseMode, PhaseReport};

// Message type IDs: Host → Clock
pub const MSG_SET_MODE: u8 = 0x01;
pub const MSG_TOGGLE_MODE: u8 = 0x02;
pub const MSG_SET_FLASH: u8 = 0x03;
pub const MSG_TOGGLE_FLASH: u8 = 0x04;
pub const MSG_SET_TEXT: u8 = 0x05;
pub const MSG_SET_TIME: u8 = 0x06;
pub const MSG_QUERY_STATUS: u8 = 0x07;

// Message type IDs: Clock → Host
pub const MSG_ACK: u8 = 0x20;
pub const MSG_NAK: u8 = 0x21;
pub const MSG_STATUS: u8 = 0x22;

/// Longest text accepted in a SET_TEXT payload
///
/// The clock truncates to its own digit count; this only bounds the frame.
pub const MAX_TEXT_LEN: usize = 32;

/// Capacity of the text fields in a status report
pub const STATUS_TEXT_LEN: usize = 16;

/// Calendar time carried by SET_TIME
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WireTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl WireTime {
    /// Check field ranges (day is checked against 31 only)
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }

    fn to_bytes(self) -> [u8; 7] {
        let [year_lo, year_hi] = self.year.to_le_bytes();
        [
            year_lo,
            year_hi,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        ]
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match *bytes {
            [year_lo, year_hi, month, day, hour, minute, second] => Some(Self {
                year: u16::from_le_bytes([year_lo, year_hi]),
                month,
                day,
                hour,
                minute,
                second,
            }),
            _ => None,
        }
    }
}

/// Commands sent by the host
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand<'a> {
    /// Select the base content source
    SetBaseMode(BaseMode),
    /// Switch between clock and custom text
    ToggleBaseMode,
    /// Enable or disable periodic flash messages
    SetFlashMessages(bool),
    /// Flip the flash message feature
    ToggleFlashMessages,
    /// Replace the custom text
    SetText(&'a str),
    /// Set the wall-clock time
    SetTime(WireTime),
    /// Request a status report
    QueryStatus,
}

impl<'a> HostCommand<'a> {
    /// Parse a command from a frame
    ///
    /// Field ranges of SET_TIME are not checked here; the clock decides
    /// whether it can apply the time.
    pub fn from_frame(frame: &'a Frame) -> Result<Self, NakReason> {
        let payload = frame.payload.as_slice();
        match (frame.msg_type, payload) {
            (MSG_SET_MODE, [byte]) => BaseMode::from_byte(*byte)
                .map(HostCommand::SetBaseMode)
                .ok_or(NakReason::Malformed),
            (MSG_TOGGLE_MODE, []) => Ok(HostCommand::ToggleBaseMode),
            (MSG_SET_FLASH, [0]) => Ok(HostCommand::SetFlashMessages(false)),
            (MSG_SET_FLASH, [1]) => Ok(HostCommand::SetFlashMessages(true)),
            (MSG_TOGGLE_FLASH, []) => Ok(HostCommand::ToggleFlashMessages),
            // Payload: [len][utf-8 bytes]
            (MSG_SET_TEXT, [len, text @ ..])
                if usize::from(*len) == text.len() && text.len() <= MAX_TEXT_LEN =>
            {
                core::str::from_utf8(text)
                    .map(HostCommand::SetText)
                    .map_err(|_| NakReason::Malformed)
            }
            (MSG_SET_TIME, _) => WireTime::from_bytes(payload)
                .map(HostCommand::SetTime)
                .ok_or(NakReason::Malformed),
            (MSG_QUERY_STATUS, []) => Ok(HostCommand::QueryStatus),
            _ => Err(NakReason::Malformed),
        }
    }

    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            HostCommand::SetBaseMode(mode) => Frame::new(MSG_SET_MODE, &[mode.to_byte()]),
            HostCommand::ToggleBaseMode => Frame::new(MSG_TOGGLE_MODE, &[]),
            HostCommand::SetFlashMessages(on) => Frame::new(MSG_SET_FLASH, &[u8::from(*on)]),
            HostCommand::ToggleFlashMessages => Frame::new(MSG_TOGGLE_FLASH, &[]),
            HostCommand::SetText(text) => {
                let bytes = text.as_bytes();
                if bytes.len() > MAX_TEXT_LEN {
                    return Err(FrameError::Oversized);
                }
                let mut payload = heapless::Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .push(bytes.len() as u8)
                    .map_err(|_| FrameError::Oversized)?;
                payload
                    .extend_from_slice(bytes)
                    .map_err(|_| FrameError::Oversized)?;
                Frame::new(MSG_SET_TEXT, &payload)
            }
            HostCommand::SetTime(time) => Frame::new(MSG_SET_TIME, &time.to_bytes()),
            HostCommand::QueryStatus => Frame::new(MSG_QUERY_STATUS, &[]),
        }
    }

    /// Message type byte of this command
    pub fn msg_type(&self) -> u8 {
        match self {
            HostCommand::SetBaseMode(_) => MSG_SET_MODE,
            HostCommand::ToggleBaseMode => MSG_TOGGLE_MODE,
            HostCommand::SetFlashMessages(_) => MSG_SET_FLASH,
            HostCommand::ToggleFlashMessages => MSG_TOGGLE_FLASH,
            HostCommand::SetText(_) => MSG_SET_TEXT,
            HostCommand::SetTime(_) => MSG_SET_TIME,
            HostCommand::QueryStatus => MSG_QUERY_STATUS,
        }
    }
}

/// Why a host command was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NakReason {
    /// Frame did not decode to a known command
    Malformed,
    /// The command was understood but could not be applied
    Rejected,
}

impl NakReason {
    fn to_byte(self) -> u8 {
        match self {
            NakReason::Malformed => 0x01,
            NakReason::Rejected => 0x02,
        }
    }

    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(NakReason::Malformed),
            0x02 => Some(NakReason::Rejected),
            _ => None,
        }
    }
}

/// Snapshot of the clock state returned for QUERY_STATUS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    /// Selected base content source
    pub base_mode: BaseMode,
    /// Flash message feature enabled
    pub flash_messages: bool,
    /// Current display-mode phase
    pub phase: PhaseReport,
    /// Stored custom text (already padded to the digit count)
    pub custom_text: String<STATUS_TEXT_LEN>,
    /// Formatted wall-clock time, or the error indicator
    pub clock_text: String<STATUS_TEXT_LEN>,
    /// Boost converter PWM duty (0-255)
    pub duty: u16,
    /// Last measured boost voltage in millivolts
    pub boost_mv: Option<u32>,
}

/// Messages sent by the clock
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockReport {
    /// Command applied
    Ack { msg_type: u8 },
    /// Command refused
    Nak { msg_type: u8, reason: NakReason },
    /// Reply to QUERY_STATUS
    Status(StatusReport),
}

impl ClockReport {
    /// Encode this report into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            ClockReport::Ack { msg_type } => Frame::new(MSG_ACK, &[*msg_type]),
            ClockReport::Nak { msg_type, reason } => {
                Frame::new(MSG_NAK, &[*msg_type, reason.to_byte()])
            }
            ClockReport::Status(report) => {
                let mut buf = [0u8; MAX_PAYLOAD_SIZE];
                let used = postcard::to_slice(report, &mut buf)
                    .map_err(|_| FrameError::Oversized)?;
                Frame::new(MSG_STATUS, used)
            }
        }
    }

    /// Parse a report from a frame (host side and tests)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match (frame.msg_type, payload) {
            (MSG_ACK, [msg_type]) => Ok(ClockReport::Ack {
                msg_type: *msg_type,
            }),
            (MSG_NAK, [msg_type, reason]) => NakReason::from_byte(*reason)
                .map(|reason| ClockReport::Nak {
                    msg_type: *msg_type,
                    reason,
                })
                .ok_or(FrameError::Malformed),
            (MSG_STATUS, _) => postcard::from_bytes(payload)
                .map(ClockReport::Status)
                .map_err(|_| FrameError::Malformed),
            _ => Err(FrameError::Malformed),
        }
    }
}
