//! Source of "today"
//!
//! All scheduling is date-only. The clock is injected so tests and hosts
//! can pin the day instead of reading the wall clock.

use std::sync::{Arc, RwLock};

use chrono::{Days, Local, NaiveDate};

/// Provides the current calendar day
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to a settable day
#[derive(Debug)]
pub struct FixedClock {
    day: RwLock<NaiveDate>,
}

impl FixedClock {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day: RwLock::new(day),
        }
    }

    /// Move the clock to `day`
    pub fn set(&self, day: NaiveDate) {
        match self.day.write() {
            Ok(mut guard) => *guard = day,
            Err(poisoned) => *poisoned.into_inner() = day,
        }
    }

    /// Move the clock forward by `days`, saturating at the last representable day
    pub fn advance(&self, days: u64) {
        let next = self
            .today()
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        self.set(next);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.day.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
