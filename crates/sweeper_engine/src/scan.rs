use sweep_logging::{sweep_info, sweep_warn};
use sweeper_core::SenderTally;

use crate::SurfaceError;

/// Sequential pager over the mailbox listing, yielding sender addresses.
#[async_trait::async_trait]
pub trait SenderSource: Send {
    /// Senders on the current page, then advance. `Ok(None)` once there are
    /// no further pages.
    async fn next_page(&mut self) -> Result<Option<Vec<String>>, SurfaceError>;
}

/// Tallies senders over at most `max_pages` pages. A failing page ends the
/// scan early; whatever was counted so far is kept.
pub async fn scan_senders(source: &mut dyn SenderSource, max_pages: usize) -> SenderTally {
    let mut tally = SenderTally::new();
    sweep_info!("Scanning up to {} pages", max_pages);

    for page in 1..=max_pages {
        match source.next_page().await {
            Ok(Some(senders)) => {
                let found = tally.record_page(&senders);
                sweep_info!(
                    "Page {}/{}: {} emails, {} unique senders so far",
                    page,
                    max_pages,
                    found,
                    tally.unique_senders()
                );
            }
            Ok(None) => {
                sweep_info!("Reached the last page after {} pages", page - 1);
                break;
            }
            Err(err) => {
                sweep_warn!("Stopping scan at page {}: {}", page, err);
                break;
            }
        }
    }
    tally
}
