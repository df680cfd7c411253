//! Embassy tasks
//!
//! - `control_loop`: owns the engine and runs it flat out
//! - `control_rx`: reassembles host frames from UART0
//! - `control_tx`: writes replies to UART0

mod control_loop;
mod control_rx;
mod control_tx;

pub use control_loop::control_loop_task;
pub use control_rx::control_rx_task;
pub use control_tx::control_tx_task;
