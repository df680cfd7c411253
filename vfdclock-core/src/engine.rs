//! One control-loop pass
//!
//! [`ClockEngine`] owns every piece of rendering and regulation state plus
//! the hardware it drives. The firmware calls [`ClockEngine::pass`] as often
//! as it can; each pass runs, in order:
//!
//! 1. the mode machine, which may rewrite the display buffer
//! 2. the boost regulator, which may adjust the duty
//! 3. the multiplexer, which may light the next digit
//!
//! Each stage keeps its own deadline and does nothing when it is not due.

use heapless::String;
use vfdclock_protocol::{HostCommand, StatusReport};

use crate::buffer::DisplayBuffer;
use crate::config::ClockConfig;
use crate::control::{CommandOutcome, ControlInputs};
use crate::frame::{Frame, PinMap};
use crate::mode::{ModeMachine, Phase};
use crate::mux::Multiplexer;
use crate::regulator::{Regulator, RegulatorTick};
use crate::traits::{DutyOutput, FrameTransmitter, RandomSource, VoltageSensor, WallClock};

/// What happened during one pass
#[derive(Debug)]
pub struct PassReport<E> {
    /// Phase entered during this pass, if any
    pub transition: Option<Phase>,
    /// Regulator tick, if one ran
    pub regulator: Option<RegulatorTick>,
    /// Frame sent to the driver, or the transmit error
    pub display: Result<Option<Frame>, E>,
}

/// Rendering and regulation pipeline
pub struct ClockEngine<D, S, P, C, R> {
    pins: PinMap,
    buffer: DisplayBuffer,
    mux: Multiplexer,
    mode: ModeMachine,
    regulator: Regulator,
    inputs: ControlInputs,
    display: D,
    sensor: S,
    duty: P,
    clock: C,
    rng: R,
}

impl<D, S, P, C, R> ClockEngine<D, S, P, C, R>
where
    D: FrameTransmitter,
    S: VoltageSensor,
    P: DutyOutput,
    C: WallClock,
    R: RandomSource,
{
    /// Create an engine
    ///
    /// `pins` is taken separately from `config` so the caller decides how to
    /// handle a bad pin description.
    pub fn new(
        config: &ClockConfig,
        pins: PinMap,
        display: D,
        sensor: S,
        duty: P,
        clock: C,
        rng: R,
    ) -> Self {
        let width = pins.digit_count();
        Self {
            buffer: DisplayBuffer::new(width),
            mux: Multiplexer::new(config.refresh.digit_us),
            mode: ModeMachine::new(config.flash, config.format, width),
            regulator: Regulator::new(config.regulator),
            inputs: ControlInputs::new(width),
            pins,
            display,
            sensor,
            duty,
            clock,
            rng,
        }
    }

    /// Boot sequence: startup duty, blank driver, first flash scheduled
    pub fn start(&mut self, now_us: u64) -> Result<(), D::Error> {
        let now_ms = now_us / 1000;
        self.regulator.start(now_ms, &mut self.duty);
        self.mode.start(now_ms, &self.inputs, &mut self.rng);
        self.display.clear()
    }

    /// Run one control-loop pass
    pub fn pass(&mut self, now_us: u64) -> PassReport<D::Error> {
        let now_ms = now_us / 1000;

        let before = self.mode.phase();
        if let Some(text) = self
            .mode
            .advance(now_ms, &self.inputs, &mut self.clock, &mut self.rng)
        {
            self.buffer.set_content(&text);
        }
        let after = self.mode.phase();
        let transition = (after != before).then_some(after);

        let regulator = self
            .regulator
            .poll(now_ms, &mut self.sensor, &mut self.duty);

        let display = self
            .mux
            .poll(now_us, &self.buffer, &self.pins, &mut self.display);

        PassReport {
            transition,
            regulator,
            display,
        }
    }

    /// Apply a command from the control surface
    pub fn apply(&mut self, command: &HostCommand<'_>) -> CommandOutcome {
        self.inputs.apply(command)
    }

    /// Snapshot for the control surface
    pub fn status(&mut self) -> StatusReport {
        let clock_text = self.mode.format().render(self.clock.now());
        StatusReport {
            base_mode: self.inputs.base_mode(),
            flash_messages: self.inputs.flash_enabled(),
            phase: self.mode.phase().into(),
            custom_text: truncated(self.inputs.custom_text()),
            clock_text: truncated(&clock_text),
            duty: self.regulator.duty(),
            boost_mv: self.regulator.last_boost_mv(),
        }
    }

    /// Current control inputs
    pub fn inputs(&self) -> &ControlInputs {
        &self.inputs
    }

    /// Mode machine, for logging
    pub fn mode(&self) -> &ModeMachine {
        &self.mode
    }

    /// Regulator state
    pub fn regulator(&self) -> &Regulator {
        &self.regulator
    }

    /// Display buffer contents
    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    /// Wall clock, e.g. to set the time
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

/// Copy as many whole characters as fit
fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for symbol in text.chars() {
        if out.push(symbol).is_err() {
            break;
        }
    }
    out
}
