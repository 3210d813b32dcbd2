use std::fmt::Write;
use std::path::Path;

use anyhow::Context;
use clap::Args;
use sweep_logging::sweep_info;
use sweeper_core::{filter_keywords, partition, Batch, FilterOptions, FilterReport, KeywordStore};
use sweeper_engine::{HistoryStore, KeywordFile, SweepReport};

use crate::browser::BrowserArgs;
use crate::settings::SweepArgs;

#[derive(Args)]
pub struct CleanArgs {
    /// Sender keywords to process instead of the stored list
    pub keywords: Vec<String>,

    /// Print the batch plan and exit without touching the mailbox
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub sweep: SweepArgs,

    #[command(flatten)]
    pub browser: BrowserArgs,
}

pub async fn run(data_dir: &Path, args: CleanArgs) -> anyhow::Result<()> {
    let file = KeywordFile::in_dir(data_dir);
    let (raw, store) = if args.keywords.is_empty() {
        let store = file
            .load()
            .context("could not read the keyword store")?;
        (store.emails().to_vec(), store)
    } else {
        let store = file
            .load_or_default()
            .context("could not read the keyword store")?;
        (args.keywords.clone(), store)
    };
    if raw.is_empty() {
        anyhow::bail!("no keywords to process; add some with `inbox-sweeper keywords add`");
    }

    let mut history = HistoryStore::load(data_dir);
    let plan = select_candidates(&raw, &store, &history, &args.sweep.filter_options());
    if plan.is_empty() {
        println!("Nothing left to clean: all {} keywords were filtered out.", raw.len());
        return Ok(());
    }

    let batches = partition(&plan.candidates, args.sweep.batch_size);
    if args.dry_run {
        print!("{}", render_plan(&batches));
        return Ok(());
    }

    let report = sweep(&args, &plan.candidates, &mut history).await?;
    print!("{}", render_summary(&report));
    Ok(())
}

fn select_candidates(
    raw: &[String],
    store: &KeywordStore,
    history: &HistoryStore,
    options: &FilterOptions,
) -> FilterReport {
    let report = filter_keywords(
        raw,
        store.protected_emails(),
        &[history.deleted(), history.safe_skipped()],
        options,
    );
    if report.removed_duplicates > 0 {
        sweep_info!("Skipped {} duplicate keywords", report.removed_duplicates);
    }
    if report.removed_processed > 0 {
        sweep_info!(
            "Skipped {} keywords already deleted or safe-skipped",
            report.removed_processed
        );
    }
    if report.removed_protected > 0 {
        sweep_info!("Skipped {} protected keywords", report.removed_protected);
    }
    if report.removed_personal > 0 {
        sweep_info!(
            "Skipped {} personal addresses ({})",
            report.removed_personal,
            options.personal_domains.suffixes().join(", ")
        );
    }
    report
}

#[cfg(feature = "browser")]
async fn sweep(
    args: &CleanArgs,
    keywords: &[String],
    history: &mut HistoryStore,
) -> anyhow::Result<SweepReport> {
    use sweep_logging::sweep_warn;
    use sweeper_engine::Sweeper;
    use tokio_util::sync::CancellationToken;

    let session = args.browser.launch().await?;
    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                sweep_warn!("Interrupted: stopping once the current batch is done");
                cancel.cancel();
            }
        })
    };

    let mut sweeper = Sweeper::new(session, args.sweep.settings()).with_cancellation(cancel);
    let report = sweeper.run(keywords, history).await;
    interrupt.abort();
    sweeper.into_surface().shutdown().await;
    Ok(report)
}

#[cfg(not(feature = "browser"))]
async fn sweep(
    _args: &CleanArgs,
    _keywords: &[String],
    _history: &mut HistoryStore,
) -> anyhow::Result<SweepReport> {
    anyhow::bail!(crate::browser::BROWSER_MISSING)
}

fn render_plan(batches: &[Batch]) -> String {
    let keywords: usize = batches.iter().map(Batch::len).sum();
    let mut out = format!(
        "Dry run: {} keywords in {} batches\n",
        keywords,
        batches.len()
    );
    for batch in batches {
        let _ = writeln!(
            out,
            "  Batch {}/{}: {}",
            batch.index + 1,
            batch.total,
            batch.keywords.join(", ")
        );
    }
    out
}

fn render_summary(report: &SweepReport) -> String {
    let mut out = String::new();
    if report.cancelled {
        let _ = writeln!(
            out,
            "Stopped early after {} batches; remaining keywords were not touched.",
            report.batches
        );
    }
    let _ = writeln!(
        out,
        "{} deleted, {} safe-skipped, {} failed, {} unresolved",
        report.deleted.len(),
        report.safe_skipped.len(),
        report.failed.len(),
        report.unresolved.len()
    );
    for (keyword, reason) in &report.failed {
        let _ = writeln!(out, "  failed: {keyword} ({reason})");
    }
    for keyword in &report.unresolved {
        let _ = writeln!(out, "  unresolved: {keyword}");
    }
    out
}
