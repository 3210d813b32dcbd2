mod browser;
mod cmd;
mod settings;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd::{analyze::AnalyzeArgs, clean::CleanArgs, keywords::KeywordsSubcommand};
use sweep_logging::LogDestination;

#[derive(Parser)]
#[command(
    name = "inbox-sweeper",
    about = "Bulk-delete mail from listed senders, a few searches at a time",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding keywords.ron and the history ledgers
    #[arg(long, global = true, env = "SWEEPER_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Also write the log to this file
    #[arg(long, global = true, env = "SWEEPER_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete mail for the stored (or given) sender keywords
    Clean(CleanArgs),

    /// Scan the mailbox and suggest high-volume senders
    Analyze(AnalyzeArgs),

    /// Inspect and edit the keyword store
    Keywords {
        #[command(subcommand)]
        subcommand: KeywordsSubcommand,
    },

    /// Show what past runs deleted and skipped
    History {
        /// Print only the totals
        #[arg(long)]
        stats: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = sweep_logging::level_from_verbosity(cli.verbose, cli.quiet);
    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    if !sweep_logging::initialize(destination, level) {
        eprintln!("warning: logging could not be fully initialized");
    }

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = cli.data_dir;
    match cli.command {
        Commands::Clean(args) => block_on(cmd::clean::run(&data_dir, args)),
        Commands::Analyze(args) => block_on(cmd::analyze::run(&data_dir, args)),
        Commands::Keywords { subcommand } => cmd::keywords::run(&data_dir, subcommand),
        Commands::History { stats } => cmd::history::run(&data_dir, stats),
    }
}

/// Units are driven from a single task, so a current-thread runtime is enough.
fn block_on<F>(future: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = anyhow::Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime.block_on(future)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_apply_to_subcommands() {
        let cli = Cli::try_parse_from([
            "inbox-sweeper",
            "keywords",
            "list",
            "--data-dir",
            "/tmp/mail",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/mail"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Keywords {
                subcommand: KeywordsSubcommand::List
            }
        ));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["inbox-sweeper", "-q", "-v", "history"]).is_err());
    }

    #[test]
    fn clean_accepts_keywords_and_flags() {
        let cli = Cli::try_parse_from([
            "inbox-sweeper",
            "clean",
            "deals@shop.example",
            "news@list.example",
            "--dry-run",
            "--batch-size",
            "3",
        ])
        .unwrap();
        let Commands::Clean(args) = cli.command else {
            panic!("expected clean");
        };
        assert_eq!(
            args.keywords,
            vec!["deals@shop.example".to_string(), "news@list.example".to_string()]
        );
        assert!(args.dry_run);
        assert_eq!(args.sweep.batch_size, 3);
    }
}
