//! Board wiring for the IV-21 clock on a Raspberry Pi Pico
//!
//! | Function           | Peripheral | GPIO          |
//! |--------------------|------------|---------------|
//! | MAX6921 CLK / DIN  | SPI1       | 10 / 11       |
//! | MAX6921 LOAD       | SIO        | 9             |
//! | MCP3221 SDA / SCL  | I2C0       | 4 / 5         |
//! | Boost switch       | PWM2 A     | 20            |
//! | Tube filament      | SIO        | 14            |
//! | Boot indicator LED | PWM1 A     | 18            |
//! | Control UART TX/RX | UART0      | 0 / 1         |

use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Blocking as I2cBlocking, I2c};
use embassy_rp::peripherals::{I2C0, RTC, SPI1};
use embassy_rp::pwm::PwmOutput;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc, RtcError};
use embassy_rp::spi::{Blocking as SpiBlocking, Spi};

use vfdclock_core::clock::day_of_year;
use vfdclock_core::traits::WallClock;
use vfdclock_core::{ClockEngine, WallTime, XorShift32};
use vfdclock_drivers::{Max6921, Mcp3221, PwmDuty};
use vfdclock_protocol::WireTime;

/// SPI clock for the MAX6921
pub const DISPLAY_SPI_HZ: u32 = 500_000;

/// RP2040 system clock
pub const SYS_CLOCK_HZ: u32 = 125_000_000;

pub type Display = Max6921<Spi<'static, SPI1, SpiBlocking>, Output<'static>>;
pub type BoostSensor = Mcp3221<I2c<'static, I2C0, I2cBlocking>>;
pub type BoostPwm = PwmDuty<PwmOutput<'static>>;
pub type IndicatorLed = PwmDuty<PwmOutput<'static>>;

/// The engine with this board's hardware plugged in
pub type Engine = ClockEngine<Display, BoostSensor, BoostPwm, RtcClock, XorShift32>;

/// PWM counter wrap value for `frequency_hz` with the divider at 1
pub fn pwm_top(frequency_hz: u32) -> u16 {
    let ticks = SYS_CLOCK_HZ / frequency_hz.max(1);
    ticks.saturating_sub(1).min(u32::from(u16::MAX)) as u16
}

/// Wall clock backed by the RP2040 RTC
///
/// The RTC does not run until it has been set once, so [`WallClock::now`]
/// returns `None` (and the tube shows the error text) until the host sends
/// the time.
pub struct RtcClock {
    rtc: Rtc<'static, RTC>,
}

impl RtcClock {
    pub fn new(rtc: Rtc<'static, RTC>) -> Self {
        Self { rtc }
    }

    /// Set the calendar time
    pub fn set(&mut self, time: WireTime) -> Result<(), RtcError> {
        self.rtc.set_datetime(DateTime {
            year: time.year,
            month: time.month,
            day: time.day,
            day_of_week: day_of_week(time.year, time.month, time.day),
            hour: time.hour,
            minute: time.minute,
            second: time.second,
        })
    }
}

impl WallClock for RtcClock {
    fn now(&mut self) -> Option<WallTime> {
        let now = self.rtc.now().ok()?;
        Some(WallTime {
            hour: now.hour,
            minute: now.minute,
            second: now.second,
            yday: day_of_year(now.year, now.month, now.day),
        })
    }
}

/// Day of the week for a Gregorian date
fn day_of_week(year: u16, month: u8, day: u8) -> DayOfWeek {
    const OFFSETS: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

    let month_index = month.clamp(1, 12) as usize - 1;
    let year = if month < 3 { year.saturating_sub(1) } else { year };
    let index = (year + year / 4 - year / 100 + year / 400 + OFFSETS[month_index] + u16::from(day))
        % 7;

    match index {
        0 => DayOfWeek::Sunday,
        1 => DayOfWeek::Monday,
        2 => DayOfWeek::Tuesday,
        3 => DayOfWeek::Wednesday,
        4 => DayOfWeek::Thursday,
        5 => DayOfWeek::Friday,
        _ => DayOfWeek::Saturday,
    }
}
