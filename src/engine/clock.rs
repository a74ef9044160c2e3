use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Local};

/// Wall-clock source for timers and the scheduler
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        ManualClock {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, at: DateTime<Local>) {
        self.now.set(at);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(add(self.now.get(), by));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}

/// `at + by`. Durations too large for chrono are capped at a century.
pub fn add(at: DateTime<Local>, by: Duration) -> DateTime<Local> {
    chrono::Duration::from_std(by)
        .ok()
        .and_then(|d| at.checked_add_signed(d))
        .or_else(|| at.checked_add_signed(chrono::Duration::days(36_500)))
        .unwrap_or(at)
}

/// `later - earlier`, or zero when `later` is not after `earlier`
pub fn until(earlier: DateTime<Local>, later: DateTime<Local>) -> Duration {
    (later - earlier).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_clones_share_time() {
        let start = Local.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let other = clock.clone();
        clock.advance(Duration::from_millis(1500));
        assert_eq!(until(start, other.now()), Duration::from_millis(1500));
    }

    #[test]
    fn until_saturates_at_zero() {
        let a = Local.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let b = add(a, Duration::from_secs(5));
        assert_eq!(until(b, a), Duration::ZERO);
        assert_eq!(until(a, b), Duration::from_secs(5));
    }
}
