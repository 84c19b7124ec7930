//! Nullable clock — deterministic time for testing.

use chrono::{DateTime, Duration, Utc};
use hashcash_types::Clock;
use std::sync::atomic::{AtomicI64, Ordering};

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to. Millisecond resolution.
pub struct NullClock {
    current_ms: AtomicI64,
}

impl NullClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            current_ms: AtomicI64::new(at.timestamp_millis()),
        }
    }

    /// Advance time. Negative durations move it back.
    pub fn advance(&self, by: Duration) {
        self.current_ms
            .fetch_add(by.num_milliseconds(), Ordering::Relaxed);
    }

    /// Set the time to a specific value.
    pub fn set(&self, at: DateTime<Utc>) {
        self.current_ms
            .store(at.timestamp_millis(), Ordering::Relaxed);
    }
}

impl Clock for NullClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.current_ms.load(Ordering::Relaxed))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_stands_still() {
        let at = Utc.with_ymd_and_hms(2013, 3, 3, 6, 0, 0).unwrap();
        let clock = NullClock::new(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), at);
    }

    #[test]
    fn test_advance_and_set() {
        let at = Utc.with_ymd_and_hms(2013, 3, 3, 6, 0, 0).unwrap();
        let clock = NullClock::new(at);
        clock.advance(Duration::milliseconds(1500));
        assert_eq!(clock.now(), at + Duration::milliseconds(1500));
        clock.advance(Duration::seconds(-2));
        assert_eq!(clock.now(), at - Duration::milliseconds(500));
        clock.set(at);
        assert_eq!(clock.now(), at);
    }
}
