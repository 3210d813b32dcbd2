use std::time::Duration;

/// Lifecycle of a work unit. `DoneEmpty`, `DoneSafeSkip` and `DoneError` are
/// absorbing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitState {
    Opening { attempts: u32 },
    Ready,
    SafetyCheck { empty_reported: bool },
    Selecting,
    Deleting,
    /// Waiting out the cooldown that started at `since`.
    Busy { since: Duration },
    DoneEmpty,
    DoneSafeSkip { count: u64 },
    DoneError { reason: String },
}

impl UnitState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UnitState::DoneEmpty | UnitState::DoneSafeSkip { .. } | UnitState::DoneError { .. }
        )
    }
}

/// How a unit left the active set. Every keyword of a run ends in exactly one
/// of these buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    Deleted { pages: u32 },
    SafeSkipped { count: u64 },
    Failed { reason: String },
    /// Still active when the batch was cut short.
    Unresolved,
}

impl UnitOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            UnitOutcome::Deleted { .. } => "deleted",
            UnitOutcome::SafeSkipped { .. } => "safe-skipped",
            UnitOutcome::Failed { .. } => "failed",
            UnitOutcome::Unresolved => "unresolved",
        }
    }
}

/// One concurrently managed deletion task. Timestamps are offsets from the
/// start of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    keyword: String,
    state: UnitState,
    last_action: Option<Duration>,
    failures: u32,
    pages_deleted: u32,
}

impl WorkUnit {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            state: UnitState::Opening { attempts: 0 },
            last_action: None,
            failures: 0,
            pages_deleted: 0,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn state(&self) -> &UnitState {
        &self.state
    }

    pub fn last_action(&self) -> Option<Duration> {
        self.last_action
    }

    /// Consecutive failed attempts since the last successful delete.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn pages_deleted(&self) -> u32 {
        self.pages_deleted
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// True when a poll at `now` would service the unit rather than skip it.
    pub fn is_due(&self, now: Duration, cooldown: Duration) -> bool {
        match self.state {
            UnitState::Busy { since } => now.saturating_sub(since) >= cooldown,
            UnitState::Ready | UnitState::Opening { .. } => true,
            _ => false,
        }
    }

    pub fn outcome(&self) -> Option<UnitOutcome> {
        match &self.state {
            UnitState::DoneEmpty => Some(UnitOutcome::Deleted {
                pages: self.pages_deleted,
            }),
            UnitState::DoneSafeSkip { count } => Some(UnitOutcome::SafeSkipped { count: *count }),
            UnitState::DoneError { reason } => Some(UnitOutcome::Failed {
                reason: reason.clone(),
            }),
            _ => None,
        }
    }

    pub(crate) fn set_state(&mut self, state: UnitState) {
        self.state = state;
    }

    pub(crate) fn touch(&mut self, now: Duration) {
        self.last_action = Some(now);
    }

    pub(crate) fn record_failure(&mut self) -> u32 {
        self.failures = self.failures.saturating_add(1);
        self.failures
    }

    pub(crate) fn record_deleted_page(&mut self) {
        self.failures = 0;
        self.pages_deleted = self.pages_deleted.saturating_add(1);
    }
}
