use std::collections::HashMap;
use std::fmt::Write;

use crate::{Ledger, PersonalDomains};

/// Per-sender message counts gathered by the sender scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SenderTally {
    counts: HashMap<String, usize>,
    pages: usize,
    messages: usize,
}

/// Filtered result of a scan, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisReport {
    pub pages_scanned: usize,
    pub messages_seen: usize,
    pub unique_senders: usize,
    pub removed_protected: usize,
    pub removed_processed: usize,
    pub removed_personal: usize,
    pub min_count: usize,
    /// Senders at or above `min_count`, busiest first.
    pub significant: Vec<(String, usize)>,
}

impl SenderTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one page of sender addresses; blanks are ignored.
    pub fn record_page<I, S>(&mut self, senders: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pages += 1;
        let mut recorded = 0;
        for sender in senders {
            let sender = sender.as_ref().trim();
            if sender.is_empty() {
                continue;
            }
            *self.counts.entry(sender.to_string()).or_insert(0) += 1;
            recorded += 1;
        }
        self.messages += recorded;
        recorded
    }

    pub fn count(&self, sender: &str) -> usize {
        self.counts.get(sender).copied().unwrap_or(0)
    }

    pub fn unique_senders(&self) -> usize {
        self.counts.len()
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Drops protected, already-processed and personal senders, then keeps
    /// those with at least `min_count` messages.
    pub fn analyze(
        &self,
        protected: &[String],
        processed: &[&Ledger],
        personal: &PersonalDomains,
        min_count: usize,
    ) -> AnalysisReport {
        let mut remaining: Vec<(&String, usize)> =
            self.counts.iter().map(|(s, c)| (s, *c)).collect();

        let before = remaining.len();
        remaining.retain(|(sender, _)| !protected.iter().any(|p| p == *sender));
        let removed_protected = before - remaining.len();

        let before = remaining.len();
        remaining.retain(|(sender, _)| !processed.iter().any(|ledger| ledger.contains(sender)));
        let removed_processed = before - remaining.len();

        let before = remaining.len();
        remaining.retain(|(sender, _)| !personal.is_personal(sender));
        let removed_personal = before - remaining.len();

        let mut significant: Vec<(String, usize)> = remaining
            .into_iter()
            .filter(|(_, count)| *count >= min_count)
            .map(|(sender, count)| (sender.clone(), count))
            .collect();
        significant.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        AnalysisReport {
            pages_scanned: self.pages,
            messages_seen: self.messages,
            unique_senders: self.counts.len(),
            removed_protected,
            removed_processed,
            removed_personal,
            min_count,
            significant,
        }
    }
}

impl AnalysisReport {
    pub fn suggested_keywords(&self) -> Vec<String> {
        self.significant.iter().map(|(s, _)| s.clone()).collect()
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(40);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "SENDERS WITH {}+ EMAILS", self.min_count);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "Scanned {} pages, {} messages, {} unique senders",
            self.pages_scanned, self.messages_seen, self.unique_senders
        );
        let _ = writeln!(
            out,
            "Filtered out {} protected, {} already processed, {} personal senders",
            self.removed_protected, self.removed_processed, self.removed_personal
        );
        if self.significant.is_empty() {
            let _ = writeln!(
                out,
                "No senders found with {}+ emails (after filtering).",
                self.min_count
            );
        } else {
            let _ = writeln!(out, "\nCopy this list into your keyword store:");
            let _ = writeln!(out, "{}", "-".repeat(20));
            out.push_str(&render_keyword_block(&self.significant));
            let _ = writeln!(out, "{}", "-".repeat(20));
        }
        let _ = writeln!(out, "{rule}");
        out
    }
}

/// Renders senders as a RON `emails` list with their counts as comments.
pub fn render_keyword_block(senders: &[(String, usize)]) -> String {
    let mut out = String::from("emails: [\n");
    for (sender, count) in senders {
        let _ = writeln!(out, "    {sender:?}, // Count: {count}");
    }
    out.push_str("],\n");
    out
}
