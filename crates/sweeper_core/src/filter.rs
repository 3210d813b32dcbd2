use std::collections::HashSet;

use crate::{Ledger, PersonalDomains};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    /// Drop keywords already present in either ledger.
    pub skip_processed: bool,
    pub personal_domains: PersonalDomains,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            skip_processed: true,
            personal_domains: PersonalDomains::default(),
        }
    }
}

/// Outcome of the pre-run filter: the surviving candidates plus how many
/// keywords each stage removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterReport {
    pub candidates: Vec<String>,
    pub removed_duplicates: usize,
    pub removed_processed: usize,
    pub removed_protected: usize,
    pub removed_personal: usize,
}

impl FilterReport {
    pub fn removed_total(&self) -> usize {
        self.removed_duplicates
            + self.removed_processed
            + self.removed_protected
            + self.removed_personal
    }

    /// An empty candidate list means there is nothing to do, not a failure.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Reduces a raw keyword list to scheduling candidates.
///
/// Stages run in order: blanks and repeats, already-processed keywords (when
/// `skip_processed`), protected keywords, personal-domain addresses.
pub fn filter_keywords(
    raw: &[String],
    protected: &[String],
    processed: &[&Ledger],
    options: &FilterOptions,
) -> FilterReport {
    let mut report = FilterReport::default();

    let mut seen = HashSet::new();
    let mut keywords: Vec<String> = Vec::with_capacity(raw.len());
    for keyword in raw {
        let keyword = keyword.trim();
        if keyword.is_empty() || !seen.insert(keyword) {
            report.removed_duplicates += 1;
            continue;
        }
        keywords.push(keyword.to_string());
    }

    if options.skip_processed {
        let before = keywords.len();
        keywords.retain(|k| !processed.iter().any(|ledger| ledger.contains(k)));
        report.removed_processed = before - keywords.len();
    }

    let protected: HashSet<&str> = protected.iter().map(|p| p.trim()).collect();
    let before = keywords.len();
    keywords.retain(|k| !protected.contains(k.as_str()));
    report.removed_protected = before - keywords.len();

    let before = keywords.len();
    keywords.retain(|k| !options.personal_domains.is_personal(k));
    report.removed_personal = before - keywords.len();

    report.candidates = keywords;
    report
}
