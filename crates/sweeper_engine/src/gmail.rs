//! Gmail web UI adapter driven over the Chrome DevTools protocol.
//!
//! Every check is a small script evaluated in the tab; a script that finds
//! nothing returns a falsy value rather than failing, so a slow render shows
//! up as "not ready yet" and the scheduler retries after a cooldown.

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use sweep_logging::{sweep_debug, sweep_info, sweep_warn};
use sweeper_core::{parse_result_count, scoped_query};
use tokio::task::JoinHandle;

use crate::scan::SenderSource;
use crate::scripts::{
    COUNT_LABELS_JS, DELETE_JS, EMPTY_BANNER_JS, OLDER_JS, SELECT_ALL_JS, SENDERS_JS,
};
use crate::surface::{MailSurface, SurfaceError, UnitHandle};
use crate::tabs::TabSet;

pub const DEFAULT_GMAIL_URL: &str = "https://mail.google.com/mail/u/0/";

#[derive(Debug, Clone)]
pub struct GmailOptions {
    /// Browser profile holding the signed-in session.
    pub profile_dir: Option<PathBuf>,
    pub headless: bool,
    pub base_url: String,
}

impl Default for GmailOptions {
    fn default() -> Self {
        Self {
            profile_dir: None,
            headless: false,
            base_url: DEFAULT_GMAIL_URL.to_string(),
        }
    }
}

/// One browser session; each work unit is a tab searching for its keyword.
pub struct GmailSession {
    browser: Browser,
    controller: Page,
    tabs: TabSet<Page>,
    options: GmailOptions,
    handler: JoinHandle<()>,
}

impl GmailSession {
    pub async fn launch(options: GmailOptions) -> Result<Self, SurfaceError> {
        let mut builder = BrowserConfig::builder();
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(dir) = &options.profile_dir {
            builder = builder.user_data_dir(dir);
        }
        let config = builder
            .build()
            .map_err(|e| SurfaceError::session_lost(format!("invalid browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SurfaceError::session_lost(format!("failed to launch browser: {e}")))?;
        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        let controller = browser.new_page(options.base_url.as_str()).await.map_err(classify)?;
        sweep_info!("Browser session started at {}", options.base_url);

        Ok(Self {
            browser,
            controller,
            tabs: TabSet::default(),
            options,
            handler,
        })
    }

    /// Opens a tab paging through the whole mailbox listing.
    pub async fn sender_scan(&self) -> Result<GmailSenderScan, SurfaceError> {
        let url = format!("{}#all", self.options.base_url);
        let page = self.browser.new_page(url.as_str()).await.map_err(classify)?;
        Ok(GmailSenderScan {
            page,
            started: false,
        })
    }

    pub async fn shutdown(mut self) {
        for page in self.tabs.drain() {
            if let Err(err) = page.close().await {
                sweep_warn!("Failed to close a tab: {}", err);
            }
        }
        if let Err(err) = self.browser.close().await {
            sweep_warn!("Browser did not close cleanly: {}", err);
        }
        self.handler.abort();
    }

    /// Closes tabs left behind by an interrupted `open_unit`.
    async fn reap_orphans(&mut self) {
        for page in self.tabs.take_stale() {
            sweep_debug!("Closing a tab left by an interrupted open");
            if let Err(err) = page.close().await {
                sweep_warn!("Failed to close an unregistered tab: {}", err);
            }
        }
    }

    fn tab(&self, handle: UnitHandle) -> Result<&Page, SurfaceError> {
        self.tabs
            .get(handle)
            .ok_or_else(|| SurfaceError::session_lost(format!("{handle} is not open")))
    }
}

#[async_trait::async_trait]
impl MailSurface for GmailSession {
    async fn open_unit(&mut self, keyword: &str) -> Result<UnitHandle, SurfaceError> {
        self.reap_orphans().await;

        let query = serde_json::to_string(&scoped_query(keyword))
            .map_err(|e| SurfaceError::transient(e.to_string()))?;
        let navigate = format!("window.location.hash = '#search/' + encodeURIComponent({query})");

        let page = self
            .browser
            .new_page(self.options.base_url.as_str())
            .await
            .map_err(classify)?;
        let navigated = self.tabs.begin(page).evaluate(navigate).await;

        if let Err(err) = navigated {
            if let Some(page) = self.tabs.abandon() {
                if let Err(close_err) = page.close().await {
                    sweep_warn!("Failed to close a tab that did not load: {}", close_err);
                }
            }
            return Err(classify(err));
        }

        let handle = self
            .tabs
            .commit()
            .ok_or_else(|| SurfaceError::transient("opened tab went missing"))?;
        sweep_debug!("{} searching {:?}", handle, keyword);
        Ok(handle)
    }

    async fn focus(&mut self, handle: UnitHandle) -> Result<(), SurfaceError> {
        self.tab(handle)?.bring_to_front().await.map_err(classify)?;
        Ok(())
    }

    async fn is_empty(&mut self, handle: UnitHandle) -> Result<bool, SurfaceError> {
        eval(self.tab(handle)?, EMPTY_BANNER_JS).await
    }

    async fn result_count(&mut self, handle: UnitHandle) -> Result<Option<u64>, SurfaceError> {
        let labels: Vec<String> = eval(self.tab(handle)?, COUNT_LABELS_JS).await?;
        Ok(labels.iter().find_map(|label| parse_result_count(label)))
    }

    async fn select_all(&mut self, handle: UnitHandle) -> Result<bool, SurfaceError> {
        eval(self.tab(handle)?, SELECT_ALL_JS).await
    }

    async fn delete_selected(&mut self, handle: UnitHandle) -> Result<bool, SurfaceError> {
        eval(self.tab(handle)?, DELETE_JS).await
    }

    async fn close_unit(&mut self, handle: UnitHandle) -> Result<(), SurfaceError> {
        if let Some(page) = self.tabs.remove(handle) {
            page.close().await.map_err(classify)?;
        }
        Ok(())
    }

    async fn park(&mut self) -> Result<(), SurfaceError> {
        self.controller.bring_to_front().await.map_err(classify)?;
        Ok(())
    }
}

/// Pages through the mailbox listing with the "Older" control.
pub struct GmailSenderScan {
    page: Page,
    started: bool,
}

impl GmailSenderScan {
    pub async fn close(self) {
        if let Err(err) = self.page.close().await {
            sweep_warn!("Failed to close the listing tab: {}", err);
        }
    }
}

#[async_trait::async_trait]
impl SenderSource for GmailSenderScan {
    async fn next_page(&mut self) -> Result<Option<Vec<String>>, SurfaceError> {
        if self.started {
            let advanced: bool = eval(&self.page, OLDER_JS).await?;
            if !advanced {
                return Ok(None);
            }
        }
        self.started = true;

        // Rows render a moment after navigation.
        for _ in 0..10 {
            tokio::time::sleep(Duration::from_millis(500)).await;
            let senders: Vec<String> = eval(&self.page, SENDERS_JS).await?;
            if !senders.is_empty() {
                return Ok(Some(senders));
            }
        }
        Ok(Some(Vec::new()))
    }
}

async fn eval<T: DeserializeOwned>(page: &Page, script: &str) -> Result<T, SurfaceError> {
    page.evaluate(script)
        .await
        .map_err(classify)?
        .into_value::<T>()
        .map_err(|e| SurfaceError::transient(format!("unexpected script result: {e}")))
}

fn classify(err: CdpError) -> SurfaceError {
    let message = err.to_string();
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("closed") || lowered.contains("no target") {
        SurfaceError::session_lost(message)
    } else {
        SurfaceError::transient(message)
    }
}
