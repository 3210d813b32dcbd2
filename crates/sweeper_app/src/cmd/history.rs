use std::fmt::Write;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Local};
use sweeper_core::{KeywordStore, Ledger};
use sweeper_engine::{HistoryStore, KeywordFile, DELETED_HISTORY_FILE};

/// Totals shown above the ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stats {
    total_deleted: usize,
    total_safe_skipped: usize,
    total_keywords: usize,
    total_protected: usize,
}

impl Stats {
    fn collect(history: &HistoryStore, store: &KeywordStore) -> Self {
        Self {
            total_deleted: history.deleted().len(),
            total_safe_skipped: history.safe_skipped().len(),
            total_keywords: store.emails().len(),
            total_protected: store.protected_emails().len(),
        }
    }
}

pub fn run(data_dir: &Path, stats_only: bool) -> anyhow::Result<()> {
    let store = KeywordFile::in_dir(data_dir)
        .load_or_default()
        .context("could not read the keyword store")?;
    let history = HistoryStore::load(data_dir);

    let mut out = render_stats(&Stats::collect(&history, &store));
    if let Some(updated) = last_updated(&data_dir.join(DELETED_HISTORY_FILE)) {
        let _ = writeln!(out, "Last deletion logged: {}", updated.format("%Y-%m-%d %H:%M"));
    }
    if !stats_only {
        out.push_str(&render_ledger("Deleted", history.deleted()));
        out.push_str(&render_ledger("Safe-skipped", history.safe_skipped()));
    }
    print!("{out}");
    Ok(())
}

fn last_updated(path: &Path) -> Option<DateTime<Local>> {
    let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok()?;
    Some(DateTime::<Local>::from(modified))
}

fn render_stats(stats: &Stats) -> String {
    format!(
        "Deleted: {}\nSafe-skipped: {}\nKeywords: {}\nProtected: {}\n",
        stats.total_deleted, stats.total_safe_skipped, stats.total_keywords, stats.total_protected
    )
}

fn render_ledger(title: &str, ledger: &Ledger) -> String {
    let mut out = format!("\n{title} ({}):\n", ledger.len());
    if ledger.is_empty() {
        out.push_str("  (none)\n");
    }
    for keyword in ledger.items() {
        let _ = writeln!(out, "  {keyword}");
    }
    out
}
