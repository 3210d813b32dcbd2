use std::ops::Range;
use std::time::Duration;

/// Randomized pacing between surface operations. Not needed for correctness;
/// it keeps the request rhythm of the underlying UI irregular.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    pub before_open: Option<Range<Duration>>,
    pub before_delete: Option<Range<Duration>>,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            before_open: Some(Duration::from_secs(2)..Duration::from_secs(4)),
            before_delete: Some(Duration::from_secs(1)..Duration::from_secs(3)),
        }
    }
}

impl Pacing {
    pub fn disabled() -> Self {
        Self {
            before_open: None,
            before_delete: None,
        }
    }
}

/// Scheduler tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSettings {
    /// Keywords processed concurrently per batch.
    pub batch_size: usize,
    /// Wait after an action before a unit is reconsidered.
    pub cooldown: Duration,
    /// Positive result counts below this are skipped instead of deleted.
    pub safety_threshold: u64,
    /// Sleep after a pass over the active set that serviced no unit.
    pub idle_backoff: Duration,
    /// Upper bound on any single surface call; a call that runs over counts
    /// as a transient failure.
    pub action_timeout: Duration,
    /// Consecutive failed attempts before a unit is abandoned; `None` retries forever.
    pub retry_budget: Option<u32>,
    /// Attempts at opening a unit's surface before it is abandoned.
    pub open_attempts: u32,
    /// Units still active this long after their batch opened are reported unresolved.
    pub batch_deadline: Option<Duration>,
    pub pacing: Pacing,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            batch_size: 5,
            cooldown: Duration::from_secs(5),
            safety_threshold: 10,
            idle_backoff: Duration::from_millis(500),
            action_timeout: Duration::from_secs(30),
            retry_budget: Some(60),
            open_attempts: 3,
            batch_deadline: None,
            pacing: Pacing::default(),
        }
    }
}
