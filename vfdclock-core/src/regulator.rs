//! Boost converter voltage regulator
//!
//! Incremental control: once per tick the boost rail is measured through
//! the feedback divider and the PWM duty moves one step toward the target,
//! clamped to a configured band.

use crate::traits::{DutyOutput, SensorError, VoltageSensor};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// PWM counter range of the boost output (8-bit)
pub const PWM_RANGE: u16 = 256;

/// Regulator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegulatorConfig {
    /// Boost rail target (mV)
    pub target_mv: u32,
    /// Upper divider resistor (Ω)
    pub divider_top_ohm: u32,
    /// Lower divider resistor (Ω)
    pub divider_bottom_ohm: u32,
    /// Lowest duty that still keeps the tube lit
    pub min_duty: u16,
    /// Highest duty; the converter gains little above ~85%
    pub max_duty: u16,
    /// Duty applied at power-on
    pub startup_duty: u16,
    /// Ticks run only when strictly more than this has passed (ms)
    pub interval_ms: u32,
    /// Every n-th tick is flagged for diagnostics
    pub diagnostic_every: u16,
}

impl Default for RegulatorConfig {
    fn default() -> Self {
        Self {
            target_mv: 30_000,
            divider_top_ohm: 390_000,
            divider_bottom_ohm: 20_000,
            min_duty: 5,
            max_duty: 220,
            startup_duty: 110,
            interval_ms: 200,
            diagnostic_every: 10,
        }
    }
}

impl RegulatorConfig {
    /// Scale a reading at the ADC pin back up to the boost rail
    ///
    /// Multiplies by the top/bottom resistor ratio.
    pub fn boost_millivolts(&self, adc_mv: u32) -> u32 {
        if self.divider_bottom_ohm == 0 {
            return 0;
        }
        let scaled =
            u64::from(adc_mv) * u64::from(self.divider_top_ohm) / u64::from(self.divider_bottom_ohm);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }

    /// One regulation step
    ///
    /// Below target the duty rises by one, above it falls by one, and an
    /// exact match leaves it alone. The result is always inside
    /// `[min_duty, max_duty]`.
    pub fn step(&self, adc_mv: u32, duty: u16) -> u16 {
        let boost_mv = self.boost_millivolts(adc_mv);
        let next = if boost_mv < self.target_mv {
            duty.saturating_add(1)
        } else if boost_mv > self.target_mv {
            duty.saturating_sub(1)
        } else {
            duty
        };
        next.clamp(self.min_duty, self.max_duty.max(self.min_duty))
    }
}

/// Duty as a percentage of the PWM range, ×10 (e.g. 430 = 43.0%)
pub fn duty_percent_x10(duty: u16) -> u32 {
    u32::from(duty) * 1000 / u32::from(PWM_RANGE)
}

/// One measurement and adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegulatorSample {
    /// Voltage at the ADC pin (mV)
    pub adc_mv: u32,
    /// Boost rail after divider scaling (mV)
    pub boost_mv: u32,
    /// Duty before this tick
    pub previous_duty: u16,
    /// Duty after this tick
    pub duty: u16,
}

/// Result of a regulation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegulatorTick {
    /// Sample taken, or why the tick was skipped
    pub result: Result<RegulatorSample, SensorError>,
    /// This tick is due for a diagnostic log line
    pub diagnostic: bool,
}

/// Closed-loop boost regulator state
#[derive(Debug, Clone)]
pub struct Regulator {
    config: RegulatorConfig,
    duty: u16,
    last_tick_ms: u64,
    ticks: u16,
    last_boost_mv: Option<u32>,
}

impl Regulator {
    /// Create a regulator at its startup duty
    pub fn new(config: RegulatorConfig) -> Self {
        let duty = config
            .startup_duty
            .clamp(config.min_duty, config.max_duty.max(config.min_duty));
        Self {
            config,
            duty,
            last_tick_ms: 0,
            ticks: 0,
            last_boost_mv: None,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &RegulatorConfig {
        &self.config
    }

    /// Current duty
    pub fn duty(&self) -> u16 {
        self.duty
    }

    /// Boost rail from the last successful tick
    pub fn last_boost_mv(&self) -> Option<u32> {
        self.last_boost_mv
    }

    /// Apply the startup duty and start the tick timer
    pub fn start<O: DutyOutput>(&mut self, now_ms: u64, output: &mut O) {
        self.last_tick_ms = now_ms;
        output.set_duty(self.duty);
    }

    /// Run a tick if the interval has passed
    ///
    /// A missing or failing ADC leaves the duty where it was.
    pub fn poll<S, O>(&mut self, now_ms: u64, sensor: &mut S, output: &mut O) -> Option<RegulatorTick>
    where
        S: VoltageSensor,
        O: DutyOutput,
    {
        if now_ms.saturating_sub(self.last_tick_ms) <= u64::from(self.config.interval_ms) {
            return None;
        }
        self.last_tick_ms = now_ms;

        self.ticks = self.ticks.wrapping_add(1);
        let diagnostic = self.config.diagnostic_every != 0
            && self.ticks % self.config.diagnostic_every == 0;

        let result = self.tick(sensor).map(|sample| {
            output.set_duty(sample.duty);
            sample
        });

        Some(RegulatorTick { result, diagnostic })
    }

    fn tick<S: VoltageSensor>(&mut self, sensor: &mut S) -> Result<RegulatorSample, SensorError> {
        if !sensor.is_connected() {
            return Err(SensorError::NotConnected);
        }
        let adc_mv = sensor.read_millivolts()?;

        let previous_duty = self.duty;
        self.duty = self.config.step(adc_mv, previous_duty);

        let boost_mv = self.config.boost_millivolts(adc_mv);
        self.last_boost_mv = Some(boost_mv);

        Ok(RegulatorSample {
            adc_mv,
            boost_mv,
            previous_duty,
            duty: self.duty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Mock ADC for testing
    struct MockSensor {
        adc_mv: u32,
        connected: bool,
        fail: bool,
    }

    impl VoltageSensor for MockSensor {
        fn read_millivolts(&mut self) -> Result<u32, SensorError> {
            if self.fail {
                Err(SensorError::Bus)
            } else {
                Ok(self.adc_mv)
            }
        }

        fn is_connected(&mut self) -> bool {
            self.connected
        }
    }

    // Mock PWM for testing
    struct MockOutput {
        duty: Option<u16>,
        writes: u32,
    }

    impl DutyOutput for MockOutput {
        fn set_duty(&mut self, duty: u16) {
            self.duty = Some(duty);
            self.writes += 1;
        }
    }

    fn sensor(adc_mv: u32) -> MockSensor {
        MockSensor {
            adc_mv,
            connected: true,
            fail: false,
        }
    }

    fn output() -> MockOutput {
        MockOutput {
            duty: None,
            writes: 0,
        }
    }

    #[test]
    fn test_divider_scaling() {
        let config = RegulatorConfig::default();
        // 19.5x divider
        assert_eq!(config.boost_millivolts(1000), 19_500);
        assert_eq!(config.boost_millivolts(2000), 39_000);
    }

    #[test]
    fn test_step_directions() {
        let config = RegulatorConfig::default();
        assert_eq!(config.step(1000, 100), 101); // 19.5 V, low
        assert_eq!(config.step(2000, 100), 99); // 39 V, high

        // Exact match needs a unity divider
        let unity = RegulatorConfig {
            divider_top_ohm: 1,
            divider_bottom_ohm: 1,
            ..config
        };
        assert_eq!(unity.step(30_000, 100), 100);
    }

    #[test]
    fn test_step_clamps() {
        let config = RegulatorConfig::default();
        assert_eq!(config.step(0, 220), 220);
        assert_eq!(config.step(3000, 5), 5);
        assert_eq!(config.step(0, 250), 220);
        assert_eq!(config.step(3000, 0), 5);
    }

    #[test]
    fn test_start_writes_startup_duty() {
        let mut regulator = Regulator::new(RegulatorConfig::default());
        let mut out = output();
        regulator.start(0, &mut out);
        assert_eq!(out.duty, Some(110));
    }

    #[test]
    fn test_interval_is_strict() {
        let mut regulator = Regulator::new(RegulatorConfig::default());
        let mut adc = sensor(1000);
        let mut out = output();
        regulator.start(0, &mut out);

        assert!(regulator.poll(200, &mut adc, &mut out).is_none());
        let tick = regulator.poll(201, &mut adc, &mut out).unwrap();
        assert_eq!(tick.result.unwrap().duty, 111);
        assert_eq!(out.duty, Some(111));
        assert!(regulator.poll(401, &mut adc, &mut out).is_none());
        assert!(regulator.poll(402, &mut adc, &mut out).is_some());
    }

    #[test]
    fn test_disconnected_holds_duty() {
        let mut regulator = Regulator::new(RegulatorConfig::default());
        let mut adc = sensor(1000);
        adc.connected = false;
        let mut out = output();
        regulator.start(0, &mut out);

        let tick = regulator.poll(300, &mut adc, &mut out).unwrap();
        assert_eq!(tick.result, Err(SensorError::NotConnected));
        assert_eq!(regulator.duty(), 110);
        assert_eq!(out.writes, 1);
        assert_eq!(regulator.last_boost_mv(), None);
    }

    #[test]
    fn test_read_failure_holds_duty() {
        let mut regulator = Regulator::new(RegulatorConfig::default());
        let mut adc = sensor(1000);
        adc.fail = true;
        let mut out = output();
        regulator.start(0, &mut out);

        let tick = regulator.poll(300, &mut adc, &mut out).unwrap();
        assert_eq!(tick.result, Err(SensorError::Bus));
        assert_eq!(regulator.duty(), 110);
    }

    #[test]
    fn test_diagnostic_every_tenth_tick() {
        let mut regulator = Regulator::new(RegulatorConfig::default());
        let mut adc = sensor(1540);
        let mut out = output();
        regulator.start(0, &mut out);

        let flagged: heapless::Vec<u64, 8> = (1..=30u64)
            .filter_map(|i| {
                regulator
                    .poll(i * 201, &mut adc, &mut out)
                    .filter(|tick| tick.diagnostic)
                    .map(|_| i)
            })
            .collect();
        assert_eq!(flagged.as_slice(), &[10, 20, 30]);
    }

    #[test]
    fn test_low_rail_ramps_to_max_then_holds() {
        let config = RegulatorConfig::default();
        let mut regulator = Regulator::new(config);
        let mut adc = sensor(100); // 1.95 V on the rail
        let mut out = output();
        regulator.start(0, &mut out);

        let mut expected = config.startup_duty;
        for tick in 1..=200u64 {
            let sample = regulator
                .poll(tick * 201, &mut adc, &mut out)
                .unwrap()
                .result
                .unwrap();
            assert_eq!(sample.previous_duty, expected);
            expected = (expected + 1).min(config.max_duty);
            assert_eq!(sample.duty, expected, "tick {tick}");
            assert_eq!(out.duty, Some(expected));
        }
        // 110 reaches 220 after 110 ticks and stays there
        assert_eq!(regulator.duty(), config.max_duty);
    }

    #[test]
    fn test_high_rail_ramps_to_min_then_holds() {
        let config = RegulatorConfig::default();
        let mut regulator = Regulator::new(config);
        let mut adc = sensor(3000); // 58.5 V on the rail
        let mut out = output();
        regulator.start(0, &mut out);

        let duties: heapless::Vec<u16, 128> = (1..=120u64)
            .map(|tick| {
                regulator
                    .poll(tick * 201, &mut adc, &mut out)
                    .unwrap()
                    .result
                    .unwrap()
                    .duty
            })
            .collect();

        assert_eq!(duties[0], 109);
        assert!(duties.windows(2).all(|w| w[1] == w[0] - 1 || w[1] == config.min_duty));
        assert_eq!(duties[104], config.min_duty);
        assert!(duties[104..].iter().all(|&d| d == config.min_duty));
    }

    #[test]
    fn test_converges_toward_target() {
        let config = RegulatorConfig::default();
        let mut duty = config.startup_duty;
        // Plant: rail rises 200 mV per duty step
        for _ in 0..500 {
            let boost_mv = u32::from(duty) * 200;
            let adc_mv = boost_mv * config.divider_bottom_ohm / config.divider_top_ohm;
            duty = config.step(adc_mv, duty);
        }
        // Target 30 V sits at duty 150
        assert!((149..=151).contains(&duty), "duty = {duty}");
    }

    #[test]
    fn test_duty_percent() {
        assert_eq!(duty_percent_x10(110), 429);
        assert_eq!(duty_percent_x10(256), 1000);
    }

    proptest! {
        #[test]
        fn step_is_monotone_and_bounded(adc_mv in 0u32..5000, duty in 0u16..300) {
            let config = RegulatorConfig::default();
            let next = config.step(adc_mv, duty);
            prop_assert!(next >= config.min_duty && next <= config.max_duty);

            let boost_mv = config.boost_millivolts(adc_mv);
            let clamped = duty.clamp(config.min_duty, config.max_duty);
            if boost_mv < config.target_mv {
                prop_assert!(next >= clamped);
            } else if boost_mv > config.target_mv {
                prop_assert!(next <= clamped);
            } else {
                prop_assert_eq!(next, clamped);
            }
        }
    }
}
