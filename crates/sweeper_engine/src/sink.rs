use std::sync::{mpsc, Arc, Mutex, MutexGuard};

use sweeper_core::{RunStatus, SweepEvent};

/// Receives scheduler transition events as they happen.
pub trait StatusSink: Send + Sync {
    fn emit(&self, event: &SweepEvent);
}

pub struct ChannelStatusSink {
    tx: mpsc::Sender<SweepEvent>,
}

impl ChannelStatusSink {
    pub fn new(tx: mpsc::Sender<SweepEvent>) -> Self {
        Self { tx }
    }
}

impl StatusSink for ChannelStatusSink {
    fn emit(&self, event: &SweepEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// Folds events into a [`RunStatus`] that other threads (a dashboard, a
/// progress printer) can snapshot at any time.
#[derive(Debug, Clone, Default)]
pub struct SharedStatus {
    inner: Arc<Mutex<RunStatus>>,
}

impl SharedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> RunStatus {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, RunStatus> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StatusSink for SharedStatus {
    fn emit(&self, event: &SweepEvent) {
        self.lock().apply(event);
    }
}
