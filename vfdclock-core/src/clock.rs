//! Wall-clock time and its display formatting

use core::fmt::Write;

use heapless::String;

/// Text shown when no wall-clock time is available
pub const ERROR_TEXT: &str = "--ERR-- ";

/// Length of the formatted clock text (`HH-MM-SS`)
pub const CLOCK_TEXT_LEN: usize = 8;

/// Day-of-year window (exclusive) in which summer time is applied
const DST_FIRST_DAY: u16 = 67;
const DST_LAST_DAY: u16 = 307;

/// Local calendar time as reported by a [`crate::traits::WallClock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallTime {
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-59
    pub second: u8,
    /// Zero-based day of the year, 0-365
    pub yday: u16,
}

impl WallTime {
    /// Shift the hour forward by one inside the summer-time window
    ///
    /// The date is left alone when the hour wraps past midnight.
    pub fn with_dst(self) -> Self {
        if self.yday > DST_FIRST_DAY && self.yday < DST_LAST_DAY {
            Self {
                hour: (self.hour + 1) % 24,
                ..self
            }
        } else {
            self
        }
    }
}

/// Clock display options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockFormat {
    /// Apply the fixed summer-time window
    pub dst: bool,
}

impl ClockFormat {
    /// Render `time` as `HH-MM-SS`, or [`ERROR_TEXT`] when absent
    pub fn render(&self, time: Option<WallTime>) -> String<CLOCK_TEXT_LEN> {
        match time {
            Some(time) if self.dst => format_time(time.with_dst()),
            Some(time) => format_time(time),
            None => error_text(),
        }
    }
}

/// Format a time as `HH-MM-SS`
pub fn format_time(time: WallTime) -> String<CLOCK_TEXT_LEN> {
    let mut text = String::new();
    // Two-digit fields always fit; out-of-range values would overflow and
    // fall back to the error text
    if write!(
        text,
        "{:02}-{:02}-{:02}",
        time.hour, time.minute, time.second
    )
    .is_err()
    {
        return error_text();
    }
    text
}

fn error_text() -> String<CLOCK_TEXT_LEN> {
    let mut text = String::new();
    let _ = text.push_str(ERROR_TEXT);
    text
}

/// Zero-based day of the year for a Gregorian date
///
/// `month` is 1-12 and `day` is 1-31. Out-of-range months clamp.
pub fn day_of_year(year: u16, month: u8, day: u8) -> u16 {
    const CUMULATIVE: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

    let month_index = month.clamp(1, 12) as usize - 1;
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let leap_day = u16::from(leap && month_index >= 2);

    CUMULATIVE[month_index] + leap_day + u16::from(day.max(1)) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u8, minute: u8, second: u8, yday: u16) -> WallTime {
        WallTime {
            hour,
            minute,
            second,
            yday,
        }
    }

    #[test]
    fn test_format_pads_fields() {
        assert_eq!(format_time(at(7, 5, 9, 0)).as_str(), "07-05-09");
        assert_eq!(format_time(at(23, 59, 59, 0)).as_str(), "23-59-59");
    }

    #[test]
    fn test_missing_time_shows_error() {
        let format = ClockFormat::default();
        assert_eq!(format.render(None).as_str(), ERROR_TEXT);
    }

    #[test]
    fn test_dst_window_is_exclusive() {
        let format = ClockFormat { dst: true };
        assert_eq!(format.render(Some(at(10, 0, 0, 67))).as_str(), "10-00-00");
        assert_eq!(format.render(Some(at(10, 0, 0, 68))).as_str(), "11-00-00");
        assert_eq!(format.render(Some(at(10, 0, 0, 306))).as_str(), "11-00-00");
        assert_eq!(format.render(Some(at(10, 0, 0, 307))).as_str(), "10-00-00");
    }

    #[test]
    fn test_dst_wraps_midnight() {
        assert_eq!(at(23, 30, 0, 200).with_dst().hour, 0);
    }

    #[test]
    fn test_dst_disabled() {
        let format = ClockFormat { dst: false };
        assert_eq!(format.render(Some(at(10, 0, 0, 200))).as_str(), "10-00-00");
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(day_of_year(2023, 1, 1), 0);
        assert_eq!(day_of_year(2023, 3, 1), 59);
        assert_eq!(day_of_year(2024, 3, 1), 60);
        assert_eq!(day_of_year(2024, 12, 31), 365);
        assert_eq!(day_of_year(1900, 3, 1), 59);
        assert_eq!(day_of_year(2000, 3, 1), 60);
    }
}
