/// Consumer webmail domains whose senders are treated as personal contacts.
pub const DEFAULT_PERSONAL_DOMAINS: &[&str] = &["gmail.com", "outlook.com"];

/// Suffix policy deciding whether an address belongs to a personal mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalDomains {
    suffixes: Vec<String>,
}

impl Default for PersonalDomains {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONAL_DOMAINS.iter().copied())
    }
}

impl PersonalDomains {
    /// Accepts bare domains (`gmail.com`) or suffixes (`@gmail.com`).
    pub fn new<S: AsRef<str>>(domains: impl IntoIterator<Item = S>) -> Self {
        let suffixes = domains
            .into_iter()
            .map(|d| d.as_ref().trim().trim_start_matches('@').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .map(|d| format!("@{d}"))
            .collect();
        Self { suffixes }
    }

    pub fn is_personal(&self, address: &str) -> bool {
        let address = address.trim().to_ascii_lowercase();
        self.suffixes.iter().any(|suffix| address.ends_with(suffix))
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }
}

/// Search text for a keyword, excluding starred and important conversations.
pub fn scoped_query(keyword: &str) -> String {
    format!("{} -is:starred -is:important", keyword.trim())
}

/// Parses the total out of a results-count label such as `1–50 of 1,234`.
///
/// Returns `None` when the label has no ` of ` part or the total is not a
/// plain number (for example `of many`).
pub fn parse_result_count(label: &str) -> Option<u64> {
    let (_, total) = label.rsplit_once(" of ")?;
    let digits: String = total
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '.' | '\u{a0}' | '\u{202f}' | ' '))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
