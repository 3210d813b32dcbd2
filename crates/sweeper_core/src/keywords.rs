/// In-memory model of the keyword store: the target list plus the protected
/// allow-list. Both lists keep insertion order and never hold duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordStore {
    emails: Vec<String>,
    protected_emails: Vec<String>,
}

impl KeywordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from raw lists, trimming entries and dropping blanks and
    /// duplicates while keeping first-seen order.
    pub fn from_lists(
        emails: impl IntoIterator<Item = String>,
        protected_emails: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut store = Self::new();
        store.merge(emails);
        for keyword in protected_emails {
            store.protect(&keyword);
        }
        store
    }

    pub fn emails(&self) -> &[String] {
        &self.emails
    }

    pub fn protected_emails(&self) -> &[String] {
        &self.protected_emails
    }

    pub fn is_protected(&self, keyword: &str) -> bool {
        self.protected_emails.iter().any(|p| p == keyword.trim())
    }

    /// Adds a target keyword. Returns `false` when it was blank or already present.
    pub fn add(&mut self, keyword: &str) -> bool {
        push_unique(&mut self.emails, keyword)
    }

    /// Removes a target keyword. Returns `false` when it was not present.
    pub fn remove(&mut self, keyword: &str) -> bool {
        remove_entry(&mut self.emails, keyword)
    }

    /// Appends every unseen keyword and returns how many were added.
    pub fn merge(&mut self, keywords: impl IntoIterator<Item = String>) -> usize {
        keywords
            .into_iter()
            .filter(|keyword| self.add(keyword))
            .count()
    }

    pub fn protect(&mut self, keyword: &str) -> bool {
        push_unique(&mut self.protected_emails, keyword)
    }

    pub fn unprotect(&mut self, keyword: &str) -> bool {
        remove_entry(&mut self.protected_emails, keyword)
    }
}

fn push_unique(list: &mut Vec<String>, keyword: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.is_empty() || list.iter().any(|existing| existing == keyword) {
        return false;
    }
    list.push(keyword.to_string());
    true
}

fn remove_entry(list: &mut Vec<String>, keyword: &str) -> bool {
    let keyword = keyword.trim();
    let before = list.len();
    list.retain(|existing| existing != keyword);
    list.len() != before
}
