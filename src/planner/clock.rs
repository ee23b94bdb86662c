//! Clock abstraction
//!
//! Planner functions take `today` as a parameter; callers get it from a `Clock`.

use chrono::{Local, NaiveDate};

pub trait Clock: Send + Sync {
    /// Current calendar date in the user's local time zone
    fn today(&self) -> NaiveDate;
}

/// Reads the system clock in local time
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
