//! Deterministic clock abstraction for expiry decisions.
//!
//! Key timestamps are kept at millisecond precision, which is what the wire
//! format carries. [`Clock::now_utc`] may return finer precision; callers that
//! stamp records go through [`truncate_to_millis`].

use chrono::{DateTime, SubsecRound, Utc};

/// Clock trait for deterministic time in tests.
pub trait Clock: Send + Sync {
    /// Get the current UTC time.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// System clock using actual wall time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Drop sub-millisecond precision from a timestamp.
pub fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

/// Build a UTC timestamp from milliseconds since the Unix epoch.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Mock clock for deterministic testing.
///
/// Shared behind an `Arc<dyn Clock>`, so advancing goes through interior
/// mutability.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug)]
pub struct MockClock {
    now: parking_lot::Mutex<DateTime<Utc>>,
}

#[cfg(any(test, feature = "test-seams"))]
impl MockClock {
    /// Create a mock clock frozen at the given time.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: parking_lot::Mutex::new(now),
        }
    }

    /// Create a mock clock frozen at the given millisecond timestamp.
    pub fn from_millis(ms: i64) -> Self {
        Self::new(from_millis(ms).expect("timestamp in chrono range"))
    }

    /// Create a mock clock from an RFC 3339 string.
    pub fn from_rfc3339(s: &str) -> Self {
        Self::new(
            DateTime::parse_from_rfc3339(s)
                .expect("valid RFC 3339")
                .with_timezone(&Utc),
        )
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut now = self.now.lock();
        *now += duration;
    }

    /// Jump the clock to an absolute time.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn system_clock_returns_time() {
        let clock = SystemClock;
        let now = clock.now_utc();
        assert!(now.year() >= 2024);
    }

    #[test]
    fn mock_clock_is_deterministic() {
        let clock = MockClock::from_rfc3339("2025-01-15T12:00:00Z");
        assert_eq!(clock.now_utc().to_rfc3339(), "2025-01-15T12:00:00+00:00");
        assert_eq!(clock.now_utc().to_rfc3339(), "2025-01-15T12:00:00+00:00");
    }

    #[test]
    fn mock_clock_advances_through_shared_reference() {
        let clock = MockClock::from_millis(1_000_000);
        clock.advance(chrono::Duration::milliseconds(500));
        assert_eq!(clock.now_utc().timestamp_millis(), 1_000_500);

        clock.set(from_millis(42).unwrap());
        assert_eq!(clock.now_utc().timestamp_millis(), 42);
    }

    #[test]
    fn truncation_drops_sub_millisecond_precision() {
        let precise = DateTime::parse_from_rfc3339("2025-01-15T12:00:00.123456789Z")
            .unwrap()
            .with_timezone(&Utc);
        let truncated = truncate_to_millis(precise);
        assert_eq!(truncated.timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(truncated.timestamp_millis(), precise.timestamp_millis());
    }
}
