//! Time source injected into the movie service.
//!
//! Production code uses [`SystemClock`]; tests and tooling can use
//! [`ManualClock`] to get deterministic timestamps and year bounds.

use std::sync::Mutex;

use chrono::{Datelike, Duration, Utc};

use crate::types::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Calendar year of [`Clock::now`] in UTC.
    fn current_year(&self) -> i32 {
        self.now().year()
    }
}

/// Wall-clock time from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Every call to [`Clock::now`] returns the current instant and then advances
/// it by `step`, so consecutive writes get strictly increasing timestamps.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
    step: Duration,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self::with_step(start, Duration::seconds(1))
    }

    pub fn with_step(start: Timestamp, step: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            step,
        }
    }

    /// Move the clock forward without reading it.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let now = *current;
        *current += self.step;
        now
    }

    fn current_year(&self) -> i32 {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .year()
    }
}
