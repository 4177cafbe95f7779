//! Shared test doubles for unit tests.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::platform::WallClock;

/// A clock that only moves when told to.
pub(crate) struct FixedClock {
    millis: AtomicI64,
    local: std::sync::Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub(crate) fn new(millis: i64, local: NaiveDateTime) -> Self {
        Self {
            millis: AtomicI64::new(millis),
            local: std::sync::Mutex::new(local),
        }
    }

    pub(crate) fn at_date(y: i32, m: u32, d: u32, h: u32, min: u32) -> Self {
        let local = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, min, 0).unwrap());
        Self::new(local.and_utc().timestamp_millis(), local)
    }

    pub(crate) fn advance_millis(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
        let mut local = self.local.lock().unwrap();
        *local += chrono::Duration::milliseconds(delta);
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at_date(2024, 1, 15, 12, 0)
    }
}

impl WallClock for FixedClock {
    fn now_local(&self) -> NaiveDateTime {
        *self.local.lock().unwrap()
    }

    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}
