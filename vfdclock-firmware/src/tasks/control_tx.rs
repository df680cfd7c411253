//! Control UART transmit task
//!
//! Sends ACK, NAK and status replies to the host.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::REPLY_CHANNEL;

/// Control TX task - sends replies to the host
#[embassy_executor::task]
pub async fn control_tx_task(mut tx: BufferedUartTx) {
    info!("Control TX task started");

    loop {
        let report = REPLY_CHANNEL.receive().await;

        let frame = match report.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to encode reply: {:?}", e);
                continue;
            }
        };

        let bytes = frame.encode();
        match tx.write_all(&bytes).await {
            Ok(()) => trace!("Reply sent: {} bytes", bytes.len()),
            Err(e) => warn!("Failed to send reply: {:?}", e),
        }
    }
}
