//! Sweeper engine: surface adapters, the batch scheduler and persistence.
mod history;
mod keyword_store;
mod pacing;
mod persist;
mod scan;
mod scheduler;
mod scripts;
mod sink;
mod surface;
mod tabs;
mod types;

#[cfg(feature = "browser")]
mod gmail;

pub use history::{
    load_ledger, save_ledger, CommitSummary, HistoryStore, DELETED_HISTORY_FILE,
    SAFE_SKIP_HISTORY_FILE,
};
pub use keyword_store::{KeywordFile, StoreError, KEYWORDS_FILE};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use scan::{scan_senders, SenderSource};
pub use scheduler::Sweeper;
pub use sink::{ChannelStatusSink, SharedStatus, StatusSink};
pub use surface::{MailSurface, SurfaceError, SurfaceFailure, UnitHandle};
pub use types::{BatchReport, SweepReport};

#[cfg(feature = "browser")]
pub use gmail::{GmailOptions, GmailSenderScan, GmailSession, DEFAULT_GMAIL_URL};
