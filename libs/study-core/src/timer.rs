//! Session timing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whole seconds between `start` and `end`, floored; 0 if `end` precedes `start`.
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis / 1000) as u64
}

/// Start and (once stopped) end instant of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimer {
    started_at: DateTime<Utc>,
    stopped_at: Option<DateTime<Utc>>,
}

impl SessionTimer {
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            stopped_at: None,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stopped_at(&self) -> Option<DateTime<Utc>> {
        self.stopped_at
    }

    /// Stop the timer and return elapsed seconds. Later calls keep the first stop.
    pub fn stop(&mut self, now: DateTime<Utc>) -> u64 {
        let end = *self.stopped_at.get_or_insert(now);
        elapsed_seconds(self.started_at, end)
    }

    /// Elapsed seconds so far, or the final value once stopped.
    pub fn elapsed(&self, now: DateTime<Utc>) -> u64 {
        elapsed_seconds(self.started_at, self.stopped_at.unwrap_or(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn floors_partial_seconds() {
        assert_eq!(elapsed_seconds(t0(), t0() + Duration::milliseconds(1999)), 1);
        assert_eq!(elapsed_seconds(t0(), t0() + Duration::milliseconds(999)), 0);
        assert_eq!(elapsed_seconds(t0(), t0() + Duration::seconds(75)), 75);
    }

    #[test]
    fn clock_going_backwards_is_zero() {
        assert_eq!(elapsed_seconds(t0(), t0() - Duration::seconds(5)), 0);
    }

    #[test]
    fn stop_is_sticky() {
        let mut timer = SessionTimer::start(t0());
        assert_eq!(timer.elapsed(t0() + Duration::seconds(3)), 3);
        assert_eq!(timer.stop(t0() + Duration::seconds(10)), 10);
        assert_eq!(timer.stop(t0() + Duration::seconds(50)), 10);
        assert_eq!(timer.elapsed(t0() + Duration::seconds(99)), 10);
        assert_eq!(timer.stopped_at(), Some(t0() + Duration::seconds(10)));
    }
}
