use std::fmt;

use sweeper_core::UnitMsg;

/// Opaque reference to one open work surface (a browser tab for web UIs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitHandle(pub u64);

impl fmt::Display for UnitHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFailure {
    /// Stale reference, timeout, slow render. Retried after a cooldown.
    Transient,
    /// The surface was closed externally or the session is gone.
    SessionLost,
    /// The adapter cannot perform the request at all.
    Unsupported,
}

impl fmt::Display for SurfaceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceFailure::Transient => write!(f, "transient failure"),
            SurfaceFailure::SessionLost => write!(f, "session lost"),
            SurfaceFailure::Unsupported => write!(f, "unsupported"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SurfaceError {
    pub kind: SurfaceFailure,
    pub message: String,
}

impl SurfaceError {
    pub fn new(kind: SurfaceFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(SurfaceFailure::Transient, message)
    }

    pub fn session_lost(message: impl Into<String>) -> Self {
        Self::new(SurfaceFailure::SessionLost, message)
    }

    pub fn is_transient(&self) -> bool {
        self.kind == SurfaceFailure::Transient
    }

    /// Translates the failure into the observation the unit state machine expects.
    pub(crate) fn into_msg(self) -> UnitMsg {
        match self.kind {
            SurfaceFailure::Transient => UnitMsg::Transient(self.message),
            SurfaceFailure::SessionLost | SurfaceFailure::Unsupported => {
                UnitMsg::SessionLost(self.to_string())
            }
        }
    }
}

/// Capability interface over one webmail UI. The scheduler only ever talks
/// to the mailbox through these primitives.
///
/// Implementations share one underlying session, so only the focused surface
/// may be acted upon; the scheduler calls [`MailSurface::focus`] before
/// every turn it gives a unit.
#[async_trait::async_trait]
pub trait MailSurface: Send {
    /// Opens a surface showing the keyword's search, excluding starred and
    /// important items. Must tolerate being retried after a failure.
    async fn open_unit(&mut self, keyword: &str) -> Result<UnitHandle, SurfaceError>;

    async fn focus(&mut self, handle: UnitHandle) -> Result<(), SurfaceError>;

    /// True only when the surface explicitly reports that nothing matched.
    async fn is_empty(&mut self, handle: UnitHandle) -> Result<bool, SurfaceError>;

    /// Best-effort total of matching items; `None` when the count cannot be
    /// located, which is distinct from zero.
    async fn result_count(&mut self, handle: UnitHandle) -> Result<Option<u64>, SurfaceError>;

    /// `Ok(false)` means the control is not there yet, not an error.
    async fn select_all(&mut self, handle: UnitHandle) -> Result<bool, SurfaceError>;

    async fn delete_selected(&mut self, handle: UnitHandle) -> Result<bool, SurfaceError>;

    async fn close_unit(&mut self, handle: UnitHandle) -> Result<(), SurfaceError>;

    /// Moves focus to a neutral surface between batches.
    async fn park(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }
}
