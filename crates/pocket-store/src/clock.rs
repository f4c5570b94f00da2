//! Time source for timestamps and the daily-counter rollover.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Local};

/// Format of the stored daily-counter date, e.g. `Mon Oct 19 2026`.
pub const DAY_FORMAT: &str = "%a %b %d %Y";

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Epoch milliseconds.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// Today's calendar day in the local time zone, as stored on disk.
    fn today(&self) -> String {
        self.now().format(DAY_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A manually driven clock.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard = *guard + by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
