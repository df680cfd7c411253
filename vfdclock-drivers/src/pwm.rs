//! Boost switch PWM output

use embedded_hal::pwm::SetDutyCycle;
use vfdclock_core::regulator::PWM_RANGE;
use vfdclock_core::traits::DutyOutput;

/// Drives the boost switch from an 8-bit duty value
///
/// The duty is applied as a fraction of [`PWM_RANGE`], so the peripheral
/// can run at whatever counter top its frequency needs.
pub struct PwmDuty<P> {
    pwm: P,
    duty: u16,
}

impl<P: SetDutyCycle> PwmDuty<P> {
    /// Wrap a configured PWM channel, initially off
    pub fn new(pwm: P) -> Self {
        Self { pwm, duty: 0 }
    }

    /// Last duty requested
    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl<P: SetDutyCycle> DutyOutput for PwmDuty<P> {
    fn set_duty(&mut self, duty: u16) {
        let duty = duty.min(PWM_RANGE);
        // Channel errors are not recoverable here; the next tick retries
        let _ = self.pwm.set_duty_cycle_fraction(duty, PWM_RANGE);
        self.duty = duty;
    }
}
