//! Inter-task communication channels
//!
//! The control loop owns the engine. The UART tasks only talk to it
//! through these queues.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use vfdclock_protocol::{ClockReport, Frame};

/// Channel capacity for received host frames
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Channel capacity for outgoing replies
const REPLY_CHANNEL_SIZE: usize = 4;

/// Complete frames received from the host, decoded by the control loop
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Frame, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Replies waiting to be sent to the host
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, ClockReport, REPLY_CHANNEL_SIZE> =
    Channel::new();
