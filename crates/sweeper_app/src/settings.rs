use std::time::Duration;

use clap::Args;
use sweeper_core::{FilterOptions, Pacing, SweepSettings};

/// Scheduler and filter tuning shared by the commands that touch the mailbox.
#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    /// Keywords processed concurrently per batch
    #[arg(long, env = "SWEEPER_BATCH_SIZE", default_value_t = 5)]
    pub batch_size: usize,

    /// Seconds a unit waits after an action before it is checked again
    #[arg(long, env = "SWEEPER_COOLDOWN_SECS", default_value_t = 5)]
    pub cooldown_secs: u64,

    /// Skip keywords with fewer matching emails than this
    #[arg(long, env = "SWEEPER_THRESHOLD", default_value_t = 10)]
    pub threshold: u64,

    /// Consecutive failed attempts before giving up on a keyword (0 = never)
    #[arg(long, env = "SWEEPER_RETRY_BUDGET", default_value_t = 60)]
    pub retry_budget: u32,

    /// Give up on units still running this many seconds into their batch
    #[arg(long, env = "SWEEPER_BATCH_DEADLINE_SECS")]
    pub batch_deadline_secs: Option<u64>,

    /// Act without the randomized pauses between operations
    #[arg(long, env = "SWEEPER_NO_PACING")]
    pub no_pacing: bool,

    /// Also process keywords already recorded in the history
    #[arg(long, env = "SWEEPER_INCLUDE_PROCESSED")]
    pub include_processed: bool,
}

impl SweepArgs {
    pub fn settings(&self) -> SweepSettings {
        SweepSettings {
            batch_size: self.batch_size,
            cooldown: Duration::from_secs(self.cooldown_secs),
            safety_threshold: self.threshold,
            retry_budget: (self.retry_budget > 0).then_some(self.retry_budget),
            batch_deadline: self.batch_deadline_secs.map(Duration::from_secs),
            pacing: if self.no_pacing {
                Pacing::disabled()
            } else {
                Pacing::default()
            },
            ..SweepSettings::default()
        }
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            skip_processed: !self.include_processed,
            ..FilterOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        sweep: SweepArgs,
    }

    fn parse(args: &[&str]) -> SweepArgs {
        let mut argv = vec!["test"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().sweep
    }

    #[test]
    fn defaults_match_scheduler_defaults() {
        let args = parse(&[]);
        assert_eq!(args.settings(), SweepSettings::default());
        assert_eq!(args.filter_options(), FilterOptions::default());
    }

    #[test]
    fn flags_map_onto_settings() {
        let args = parse(&[
            "--batch-size",
            "2",
            "--cooldown-secs",
            "9",
            "--threshold",
            "25",
            "--retry-budget",
            "0",
            "--batch-deadline-secs",
            "600",
            "--no-pacing",
            "--include-processed",
        ]);
        let settings = args.settings();
        assert_eq!(settings.batch_size, 2);
        assert_eq!(settings.cooldown, Duration::from_secs(9));
        assert_eq!(settings.safety_threshold, 25);
        assert_eq!(settings.retry_budget, None);
        assert_eq!(settings.batch_deadline, Some(Duration::from_secs(600)));
        assert_eq!(settings.pacing, Pacing::disabled());
        assert!(!args.filter_options().skip_processed);
    }
}
