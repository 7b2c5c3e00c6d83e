//! Clock capability - The single external input of the transition logic
//!
//! Date stamps (request/start/completed) come from here instead of the
//! wall clock directly, keeping transitions deterministic under test.

use chrono::NaiveDate;

/// Display and wire format for case dates, e.g. `21-05-2023`.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Source of "today" for date-stamping transitions.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Production clock, reads the local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Clock pinned to one date, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_pinned() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 21).unwrap();
        let clock = FixedClock(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.today().format(DATE_FORMAT).to_string(), "21-05-2023");
    }
}
