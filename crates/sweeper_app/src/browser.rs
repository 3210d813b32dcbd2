use std::path::PathBuf;

use clap::Args;

#[cfg(not(feature = "browser"))]
pub const BROWSER_MISSING: &str =
    "this build has no mailbox driver; rebuild with `--features browser`";

/// How to reach the signed-in webmail session.
#[derive(Args, Debug, Clone)]
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
pub struct BrowserArgs {
    /// Browser profile directory holding the signed-in session
    #[arg(long, env = "SWEEPER_PROFILE_DIR")]
    pub profile_dir: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long, env = "SWEEPER_HEADLESS")]
    pub headless: bool,
}

#[cfg(feature = "browser")]
impl BrowserArgs {
    pub async fn launch(&self) -> anyhow::Result<sweeper_engine::GmailSession> {
        use anyhow::Context;
        use sweeper_engine::{GmailOptions, GmailSession};

        let options = GmailOptions {
            profile_dir: self.profile_dir.clone(),
            headless: self.headless,
            ..GmailOptions::default()
        };
        GmailSession::launch(options)
            .await
            .context("could not start the browser session")
    }
}
