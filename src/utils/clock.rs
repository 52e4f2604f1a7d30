//! Injectable "today"
//!
//! The formatter prints the current date in headers; everything else is pure,
//! so the clock is the only seam needed to keep exports reproducible.

use chrono::{Local, NaiveDate};

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// `d/m/yyyy` without padding, the it-IT short date
pub fn format_it_date(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_and_italian_format() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(format_it_date(clock.today()), "5/1/2024");
        let date = NaiveDate::from_ymd_opt(2024, 11, 25).unwrap();
        assert_eq!(format_it_date(date), "25/11/2024");
    }
}
