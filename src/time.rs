use chrono::{DateTime, Utc};

/// A source for the current time.
///
/// Tokens take their `iat` and `exp` claims from this, so a fixed provider makes issued tokens deterministic.
pub trait TimeProvider: Send + Sync + 'static {
    /// The current time.
    fn current_time(&self) -> DateTime<Utc>;
}

/// A time provider backed by the system's wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClockTimeProvider;

impl TimeProvider for SystemClockTimeProvider {
    fn current_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A time provider that always returns the same instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedTimeProvider(pub DateTime<Utc>);

impl FixedTimeProvider {
    /// Construct a provider fixed at the given unix timestamp, in seconds.
    ///
    /// Returns `None` if the timestamp is out of range.
    pub fn from_timestamp(seconds: i64) -> Option<Self> {
        DateTime::from_timestamp(seconds, 0).map(Self)
    }
}

impl TimeProvider for FixedTimeProvider {
    fn current_time(&self) -> DateTime<Utc> {
        self.0
    }
}
