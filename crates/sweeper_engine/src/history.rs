use std::fs;
use std::path::{Path, PathBuf};

use sweep_logging::{sweep_info, sweep_warn};
use sweeper_core::Ledger;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::types::BatchReport;

pub const DELETED_HISTORY_FILE: &str = "deleted_history.json";
pub const SAFE_SKIP_HISTORY_FILE: &str = "safe_not_deleted.json";

/// Loads a ledger stored as a JSON array of strings.
///
/// A missing file is an empty ledger. An unreadable or corrupt file is logged
/// and also treated as empty: history loading never aborts a run.
pub fn load_ledger(path: &Path) -> Ledger {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ledger::new(),
        Err(err) => {
            sweep_warn!("Failed to read history from {:?}: {}", path, err);
            return Ledger::new();
        }
    };

    match serde_json::from_str::<Vec<String>>(&content) {
        Ok(items) => Ledger::from_items(items),
        Err(err) => {
            sweep_warn!("Ignoring corrupt history in {:?}: {}", path, err);
            Ledger::new()
        }
    }
}

/// Rewrites the whole ledger file as a pretty-printed JSON array.
pub fn save_ledger(dir: &Path, filename: &str, ledger: &Ledger) -> Result<PathBuf, PersistError> {
    let content = serde_json::to_string_pretty(ledger.items())?;
    AtomicFileWriter::new(dir.to_path_buf()).write(filename, &content)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitSummary {
    pub new_deleted: usize,
    pub new_safe_skipped: usize,
}

/// The two outcome ledgers of past runs. Updated only when a batch has fully
/// drained, so an interrupted batch leaves no partial record.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    dir: Option<PathBuf>,
    deleted: Ledger,
    safe_skipped: Ledger,
    unsaved_deleted: bool,
    unsaved_safe_skipped: bool,
}

impl HistoryStore {
    /// Loads both ledgers from `dir`; commits will be written back there.
    pub fn load(dir: &Path) -> Self {
        let deleted = load_ledger(&dir.join(DELETED_HISTORY_FILE));
        let safe_skipped = load_ledger(&dir.join(SAFE_SKIP_HISTORY_FILE));
        sweep_info!(
            "Loaded history from {:?}: {} deleted, {} safe-skipped",
            dir,
            deleted.len(),
            safe_skipped.len()
        );
        Self {
            dir: Some(dir.to_path_buf()),
            deleted,
            safe_skipped,
            unsaved_deleted: false,
            unsaved_safe_skipped: false,
        }
    }

    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn deleted(&self) -> &Ledger {
        &self.deleted
    }

    pub fn safe_skipped(&self) -> &Ledger {
        &self.safe_skipped
    }

    /// Merges a drained batch into both ledgers and persists whichever changed.
    ///
    /// The in-memory ledgers are updated even when writing fails, and a later
    /// commit retries the write with the full history.
    pub fn commit_batch(&mut self, batch: &BatchReport) -> Result<CommitSummary, PersistError> {
        let summary = CommitSummary {
            new_deleted: self.deleted.merge(batch.deleted.iter().cloned()),
            new_safe_skipped: self.safe_skipped.merge(batch.safe_skipped.iter().cloned()),
        };
        self.unsaved_deleted |= summary.new_deleted > 0;
        self.unsaved_safe_skipped |= summary.new_safe_skipped > 0;

        if let Some(dir) = &self.dir {
            if self.unsaved_deleted {
                save_ledger(dir, DELETED_HISTORY_FILE, &self.deleted)?;
                self.unsaved_deleted = false;
                sweep_info!(
                    "Logged {} new deleted keywords to {}",
                    summary.new_deleted,
                    DELETED_HISTORY_FILE
                );
            }
            if self.unsaved_safe_skipped {
                save_ledger(dir, SAFE_SKIP_HISTORY_FILE, &self.safe_skipped)?;
                self.unsaved_safe_skipped = false;
                sweep_info!(
                    "Logged {} safe-skipped keywords to {}",
                    summary.new_safe_skipped,
                    SAFE_SKIP_HISTORY_FILE
                );
            }
        }
        Ok(summary)
    }
}
