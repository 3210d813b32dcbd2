use sweeper_core::UnitOutcome;

/// Outcomes of one drained batch, in completion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub index: usize,
    pub deleted: Vec<String>,
    pub safe_skipped: Vec<String>,
    /// Keyword and reason for units abandoned as errors.
    pub failed: Vec<(String, String)>,
    pub unresolved: Vec<String>,
}

impl BatchReport {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn record(&mut self, keyword: String, outcome: UnitOutcome) {
        match outcome {
            UnitOutcome::Deleted { .. } => self.deleted.push(keyword),
            UnitOutcome::SafeSkipped { .. } => self.safe_skipped.push(keyword),
            UnitOutcome::Failed { reason } => self.failed.push((keyword, reason)),
            UnitOutcome::Unresolved => self.unresolved.push(keyword),
        }
    }

    pub fn units(&self) -> usize {
        self.deleted.len() + self.safe_skipped.len() + self.failed.len() + self.unresolved.len()
    }
}

/// Result of a whole run, handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub deleted: Vec<String>,
    pub safe_skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub unresolved: Vec<String>,
    /// Batches that fully drained.
    pub batches: usize,
    /// True when the run stopped early at a batch boundary.
    pub cancelled: bool,
}

impl SweepReport {
    pub(crate) fn absorb(&mut self, batch: BatchReport) {
        self.deleted.extend(batch.deleted);
        self.safe_skipped.extend(batch.safe_skipped);
        self.failed.extend(batch.failed);
        self.unresolved.extend(batch.unresolved);
        self.batches += 1;
    }

    pub fn units(&self) -> usize {
        self.deleted.len() + self.safe_skipped.len() + self.failed.len() + self.unresolved.len()
    }
}
