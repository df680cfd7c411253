//! Control UART receive task
//!
//! Reassembles frames from the host and queues them for the control loop.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use vfdclock_protocol::FrameParser;

use crate::channels::COMMAND_CHANNEL;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Control RX task - receives and parses frames from the host
#[embassy_executor::task]
pub async fn control_rx_task(mut rx: BufferedUartRx) {
    info!("Control RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => {
                            // Blocks until the control loop drains the queue
                            COMMAND_CHANNEL.send(frame).await;
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
