use std::path::Path;

use anyhow::Context;
use clap::Args;
use sweep_logging::sweep_info;
use sweeper_core::{AnalysisReport, PersonalDomains, SenderTally};
use sweeper_engine::{HistoryStore, KeywordFile};

use crate::browser::BrowserArgs;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Listing pages to scan
    #[arg(long, default_value_t = 500)]
    pub pages: usize,

    /// Minimum emails from one sender for it to be suggested
    #[arg(long, default_value_t = 10)]
    pub min_count: usize,

    /// Append the suggested senders to the keyword store
    #[arg(long)]
    pub merge: bool,

    #[command(flatten)]
    pub browser: BrowserArgs,
}

pub async fn run(data_dir: &Path, args: AnalyzeArgs) -> anyhow::Result<()> {
    let tally = scan(&args).await?;
    let outcome = summarize(data_dir, &tally, args.min_count, args.merge)?;
    print!("{}", outcome.report.render());
    if let Some(added) = outcome.merged {
        println!("Added {added} new senders to the keyword store.");
    }
    Ok(())
}

struct Summary {
    report: AnalysisReport,
    merged: Option<usize>,
}

/// Filters the tally against the store and history, merging the suggestions
/// into the keyword store when asked.
fn summarize(
    data_dir: &Path,
    tally: &SenderTally,
    min_count: usize,
    merge: bool,
) -> anyhow::Result<Summary> {
    let file = KeywordFile::in_dir(data_dir);
    let mut store = file
        .load_or_default()
        .context("could not read the keyword store")?;
    let history = HistoryStore::load(data_dir);

    let report = tally.analyze(
        store.protected_emails(),
        &[history.deleted(), history.safe_skipped()],
        &PersonalDomains::default(),
        min_count,
    );
    sweep_info!(
        "Filtered out {} protected, {} already processed, {} personal senders",
        report.removed_protected,
        report.removed_processed,
        report.removed_personal
    );

    let merged = if merge {
        let added = store.merge(report.suggested_keywords());
        file.save(&store)
            .context("could not update the keyword store")?;
        Some(added)
    } else {
        None
    };
    Ok(Summary { report, merged })
}

#[cfg(feature = "browser")]
async fn scan(args: &AnalyzeArgs) -> anyhow::Result<SenderTally> {
    let session = args.browser.launch().await?;
    let mut listing = session.sender_scan().await?;
    let tally = sweeper_engine::scan_senders(&mut listing, args.pages).await;
    listing.close().await;
    session.shutdown().await;
    Ok(tally)
}

#[cfg(not(feature = "browser"))]
async fn scan(_args: &AnalyzeArgs) -> anyhow::Result<SenderTally> {
    anyhow::bail!(crate::browser::BROWSER_MISSING)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use sweeper_engine::{DELETED_HISTORY_FILE, KEYWORDS_FILE};
    use tempfile::TempDir;

    use super::*;

    fn tally() -> SenderTally {
        let mut tally = SenderTally::new();
        let mut page = vec!["promo@shop.example"; 12];
        page.extend(vec!["old@news.example"; 15]);
        page.extend(vec!["friend@gmail.com"; 20]);
        page.extend(vec!["rare@misc.example"; 2]);
        tally.record_page(page);
        tally
    }

    #[test]
    fn suggestions_skip_processed_and_personal_senders() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(DELETED_HISTORY_FILE),
            "[\"old@news.example\"]",
        )
        .unwrap();

        let summary = summarize(temp.path(), &tally(), 10, false).unwrap();

        assert_eq!(
            summary.report.suggested_keywords(),
            vec!["promo@shop.example".to_string()]
        );
        assert_eq!(summary.merged, None);
        assert!(!temp.path().join(KEYWORDS_FILE).exists());
    }

    #[test]
    fn merge_appends_suggestions_to_the_store() {
        let temp = TempDir::new().unwrap();
        let file = KeywordFile::in_dir(temp.path());
        let mut store = sweeper_core::KeywordStore::new();
        store.add("promo@shop.example");
        store.add("kept@list.example");
        file.save(&store).unwrap();

        let summary = summarize(temp.path(), &tally(), 1, true).unwrap();

        assert_eq!(summary.merged, Some(2));
        let saved = file.load().unwrap();
        assert_eq!(
            saved.emails(),
            &[
                "promo@shop.example".to_string(),
                "kept@list.example".to_string(),
                "old@news.example".to_string(),
                "rare@misc.example".to_string(),
            ][..]
        );
    }
}
