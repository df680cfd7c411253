//! Control loop task
//!
//! Owns the [`Engine`] and calls [`Engine::pass`] back to back. Between
//! passes it applies any queued host commands and yields so the UART tasks
//! get a turn. Digit refresh, mode changes and boost regulation all keep
//! their own deadlines inside the engine.

use defmt::*;
use embassy_futures::yield_now;
use embassy_time::Instant;

use vfdclock_core::control::CommandOutcome;
use vfdclock_core::regulator::{duty_percent_x10, RegulatorTick};
use vfdclock_core::traits::SensorError;
use vfdclock_core::Phase;
use vfdclock_protocol::{ClockReport, Frame, HostCommand, NakReason};

use crate::board::Engine;
use crate::channels::{COMMAND_CHANNEL, REPLY_CHANNEL};

/// Control loop task - runs the clock
#[embassy_executor::task]
pub async fn control_loop_task(mut engine: Engine) {
    info!("Control loop task started");

    if let Err(e) = engine.start(Instant::now().as_micros()) {
        warn!("Failed to blank display: {:?}", Debug2Format(&e));
    }
    log_next_flash(&engine, Instant::now().as_millis());

    loop {
        while let Ok(frame) = COMMAND_CHANNEL.try_receive() {
            let reply = handle_frame(&mut engine, &frame);
            if REPLY_CHANNEL.try_send(reply).is_err() {
                warn!("Reply channel full, dropping reply");
            }
        }

        let now_us = Instant::now().as_micros();
        let report = engine.pass(now_us);

        if let Some(phase) = report.transition {
            log_transition(&engine, phase, now_us / 1000);
        }
        if let Some(tick) = report.regulator {
            log_regulator(&tick, engine.regulator().config().target_mv);
        }
        if let Err(e) = report.display {
            warn!("Frame transmit failed: {:?}", Debug2Format(&e));
        }

        yield_now().await;
    }
}

/// Decode and apply one host frame, returning the reply
fn handle_frame(engine: &mut Engine, frame: &Frame) -> ClockReport {
    let msg_type = frame.msg_type;

    let command = match HostCommand::from_frame(frame) {
        Ok(command) => command,
        Err(reason) => {
            warn!("Bad command {:#x}", msg_type);
            return ClockReport::Nak { msg_type, reason };
        }
    };
    info!("Command: {:?}", command);

    match engine.apply(&command) {
        CommandOutcome::Updated => ClockReport::Ack { msg_type },
        CommandOutcome::StatusRequested => ClockReport::Status(engine.status()),
        CommandOutcome::SetTime(time) => match engine.clock_mut().set(time) {
            Ok(()) => {
                info!("Clock set: {:?}", time);
                ClockReport::Ack { msg_type }
            }
            Err(e) => {
                warn!("RTC rejected time: {:?}", Debug2Format(&e));
                ClockReport::Nak {
                    msg_type,
                    reason: NakReason::Rejected,
                }
            }
        },
        CommandOutcome::Rejected => ClockReport::Nak {
            msg_type,
            reason: NakReason::Rejected,
        },
    }
}

fn log_transition(engine: &Engine, phase: Phase, now_ms: u64) {
    match phase {
        Phase::GlitchIn => info!("Flash: {}", engine.mode().message()),
        Phase::Flashing => debug!("Flash message shown"),
        Phase::GlitchOut => debug!("Flash message ending"),
        Phase::Base => log_next_flash(engine, now_ms),
    }
}

fn log_next_flash(engine: &Engine, now_ms: u64) {
    match engine.mode().next_flash_ms() {
        Some(at) => info!("Next flash in {} s", at.saturating_sub(now_ms) / 1000),
        None => info!("Flash messages idle"),
    }
}

fn log_regulator(tick: &RegulatorTick, target_mv: u32) {
    match tick.result {
        Ok(sample) => {
            if tick.diagnostic {
                let before = duty_percent_x10(sample.previous_duty);
                let after = duty_percent_x10(sample.duty);
                debug!(
                    "Boost: adc={}mV hv={}mV target={}mV duty {} ({}.{}%) -> {} ({}.{}%)",
                    sample.adc_mv,
                    sample.boost_mv,
                    target_mv,
                    sample.previous_duty,
                    before / 10,
                    before % 10,
                    sample.duty,
                    after / 10,
                    after % 10
                );
            }
        }
        Err(SensorError::NotConnected) => warn!("MCP3221 not responding, duty held"),
        Err(SensorError::Bus) => warn!("MCP3221 read failed, duty held"),
    }
}
