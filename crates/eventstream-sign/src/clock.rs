//! Injectable wall-clock source, so chunk-signing tests can fix the
//! timestamp instead of racing the system clock.

use chrono::{DateTime, Utc};

/// Supplies the current UTC wall-clock time used to stamp a chunk signature.
///
/// SigV4 signs a specific instant, not a monotonic tick, so this is plain
/// wall time rather than the monotonic `Instant` a transport-level clock
/// would use.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// The production clock, backed by [`chrono::Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub(crate) struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
