use std::collections::VecDeque;

use crate::UnitOutcome;

/// Log lines kept in [`RunStatus::logs`].
pub const LOG_TAIL_LIMIT: usize = 200;

/// Transition points reported by the scheduler while a run is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepEvent {
    RunStarted {
        total_keywords: usize,
        batches: usize,
    },
    BatchStarted {
        index: usize,
        total: usize,
        keywords: Vec<String>,
    },
    UnitOpened {
        keyword: String,
    },
    /// The unit now holds focus on the shared session.
    UnitFocused {
        keyword: String,
    },
    UnitFinished {
        keyword: String,
        outcome: UnitOutcome,
    },
    BatchFinished {
        index: usize,
        total: usize,
    },
    /// Ledger persistence degraded; the run continues.
    Warning {
        message: String,
    },
    RunFinished {
        cancelled: bool,
    },
}

/// Snapshot consumed by status reporters (terminal, dashboard).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunStatus {
    pub running: bool,
    pub completed: usize,
    pub total: usize,
    pub current_keyword: Option<String>,
    pub deleted: usize,
    pub safe_skipped: usize,
    pub failed: usize,
    pub unresolved: usize,
    pub logs: VecDeque<String>,
}

impl RunStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completion in whole percent; 0 before any keyword is known.
    pub fn progress(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed.min(self.total) * 100) / self.total) as u8
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    pub fn apply(&mut self, event: &SweepEvent) {
        match event {
            SweepEvent::RunStarted {
                total_keywords,
                batches,
            } => {
                *self = RunStatus {
                    running: true,
                    total: *total_keywords,
                    ..RunStatus::default()
                };
                self.push_log(format!(
                    "Starting run: {total_keywords} keywords in {batches} batches"
                ));
            }
            SweepEvent::BatchStarted {
                index,
                total,
                keywords,
            } => {
                self.push_log(format!(
                    "Batch {}/{} started ({} keywords)",
                    index + 1,
                    total,
                    keywords.len()
                ));
            }
            SweepEvent::UnitOpened { keyword } => {
                self.push_log(format!("[{keyword}] opened"));
            }
            SweepEvent::UnitFocused { keyword } => {
                self.current_keyword = Some(keyword.clone());
            }
            SweepEvent::UnitFinished { keyword, outcome } => {
                self.completed += 1;
                match outcome {
                    UnitOutcome::Deleted { .. } => self.deleted += 1,
                    UnitOutcome::SafeSkipped { .. } => self.safe_skipped += 1,
                    UnitOutcome::Failed { .. } => self.failed += 1,
                    UnitOutcome::Unresolved => self.unresolved += 1,
                }
                if self.current_keyword.as_deref() == Some(keyword.as_str()) {
                    self.current_keyword = None;
                }
                self.push_log(describe_outcome(keyword, outcome));
            }
            SweepEvent::BatchFinished { index, total } => {
                self.current_keyword = None;
                self.push_log(format!("Batch {}/{} finished", index + 1, total));
            }
            SweepEvent::Warning { message } => {
                self.push_log(format!("warning: {message}"));
            }
            SweepEvent::RunFinished { cancelled } => {
                self.running = false;
                self.current_keyword = None;
                let verb = if *cancelled { "stopped" } else { "finished" };
                self.push_log(format!(
                    "Run {verb}: {} deleted, {} safe-skipped, {} failed, {} unresolved",
                    self.deleted, self.safe_skipped, self.failed, self.unresolved
                ));
            }
        }
    }

    fn push_log(&mut self, line: String) {
        if self.logs.len() == LOG_TAIL_LIMIT {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }
}

fn describe_outcome(keyword: &str, outcome: &UnitOutcome) -> String {
    match outcome {
        UnitOutcome::Deleted { pages } => {
            format!("[{keyword}] no more messages after {pages} delete pass(es)")
        }
        UnitOutcome::SafeSkipped { count } => {
            format!("[{keyword}] only {count} messages, below safety threshold; skipped")
        }
        UnitOutcome::Failed { reason } => format!("[{keyword}] abandoned: {reason}"),
        UnitOutcome::Unresolved => format!("[{keyword}] still active at batch end; unresolved"),
    }
}
