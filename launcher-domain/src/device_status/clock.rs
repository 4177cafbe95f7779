//! Boundary-aligned clock and date ticking.
//!
//! The ticker sleeps until the next minute (or local midnight) boundary
//! instead of polling, and only emits when the formatted period actually
//! changed.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use tokio::sync::oneshot;
use tracing::{trace, warn};

use crate::live::{Emitter, LiveSequence, Producer, Subscription};
use crate::platform::WallClock;

const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_DAY: u64 = 24 * 60 * NANOS_PER_MINUTE;

/// Longest single sleep of the date ticker. Local days are not always 24
/// hours long, so the wait to midnight is re-measured at least this often.
const MAX_DAY_SLEEP: Duration = Duration::from_secs(60 * 60);

/// Time left until the next minute boundary.
///
/// Zero exactly on a boundary. Sub-second precision is kept, so sleeping for
/// the returned duration never wakes before the boundary.
pub fn delay_to_next_minute<T: Timelike>(now: &T) -> Duration {
    let elapsed = u64::from(now.second()) * NANOS_PER_SECOND + u64::from(now.nanosecond());
    if elapsed == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(NANOS_PER_MINUTE.saturating_sub(elapsed))
}

/// Time left until the next local midnight. Zero exactly at midnight.
pub fn delay_to_next_day<T: Timelike>(now: &T) -> Duration {
    let elapsed =
        u64::from(now.num_seconds_from_midnight()) * NANOS_PER_SECOND + u64::from(now.nanosecond());
    if elapsed == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(NANOS_PER_DAY.saturating_sub(elapsed))
}

/// How often a [`ClockTicker`] re-emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Minute,
    Day,
}

impl Cadence {
    fn delay_to_next(&self, now: &NaiveDateTime) -> Duration {
        match self {
            Cadence::Minute => delay_to_next_minute(now),
            Cadence::Day => delay_to_next_day(now),
        }
    }

    fn period(&self) -> Duration {
        match self {
            Cadence::Minute => Duration::from_nanos(NANOS_PER_MINUTE),
            Cadence::Day => Duration::from_nanos(NANOS_PER_DAY),
        }
    }

    /// How long to sleep from `now`; an exact boundary waits a full period.
    fn sleep_from(&self, now: &NaiveDateTime) -> Duration {
        let mut delay = self.delay_to_next(now);
        if delay.is_zero() {
            delay = self.period();
        }
        match self {
            Cadence::Minute => delay,
            Cadence::Day => delay.min(MAX_DAY_SLEEP),
        }
    }

    fn period_key(&self, now: &NaiveDateTime) -> (NaiveDate, u32) {
        match self {
            Cadence::Minute => (now.date(), now.hour() * 60 + now.minute()),
            Cadence::Day => (now.date(), 0),
        }
    }
}

/// Formats `now`, falling back to ISO 8601 when the pattern is invalid.
pub fn format_timestamp(now: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", now.format(pattern)).is_err() {
        warn!(pattern, "Invalid time format pattern, falling back to ISO 8601");
        out.clear();
        out.push_str(&now.format("%Y-%m-%dT%H:%M").to_string());
    }
    out
}

struct TickProducer {
    clock: Arc<dyn WallClock>,
    cadence: Cadence,
    pattern: String,
}

#[async_trait]
impl Producer<String> for TickProducer {
    async fn produce(&self, emitter: Emitter<String>, mut stop: oneshot::Receiver<()>) {
        let mut last_period = None;
        loop {
            let now = self.clock.now_local();
            let period = self.cadence.period_key(&now);
            if last_period != Some(period) {
                if !emitter.emit(format_timestamp(&now, &self.pattern)) {
                    break;
                }
                last_period = Some(period);
            }

            let delay = self.cadence.sleep_from(&now);
            trace!(cadence = ?self.cadence, delay_ms = delay.as_millis() as u64, "Clock sleeping");

            tokio::select! {
                _ = &mut stop => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

/// Live sequence of formatted "now" strings, re-emitted at each boundary.
#[derive(Clone)]
pub struct ClockTicker {
    sequence: LiveSequence<String>,
}

impl ClockTicker {
    pub fn new(clock: Arc<dyn WallClock>, cadence: Cadence, pattern: impl Into<String>) -> Self {
        let name = match cadence {
            Cadence::Minute => "clock.time",
            Cadence::Day => "clock.date",
        };
        Self {
            sequence: LiveSequence::new(
                name,
                TickProducer {
                    clock,
                    cadence,
                    pattern: pattern.into(),
                },
            ),
        }
    }

    /// Time of day, re-emitted every minute.
    pub fn time(clock: Arc<dyn WallClock>, pattern: impl Into<String>) -> Self {
        Self::new(clock, Cadence::Minute, pattern)
    }

    /// Calendar date, re-emitted at local midnight.
    pub fn date(clock: Arc<dyn WallClock>, pattern: impl Into<String>) -> Self {
        Self::new(clock, Cadence::Day, pattern)
    }

    pub fn observe(&self) -> Subscription<String> {
        self.sequence.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.sequence.is_active()
    }
}
