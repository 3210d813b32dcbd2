/// An ordered slice of keywords whose work units are live at the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Zero-based position in the run.
    pub index: usize,
    pub total: usize,
    pub keywords: Vec<String>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Splits keywords into consecutive batches of at most `batch_size`, keeping
/// the supplied order. A `batch_size` of zero is treated as one.
pub fn partition(keywords: &[String], batch_size: usize) -> Vec<Batch> {
    let size = batch_size.max(1);
    let total = keywords.len().div_ceil(size);
    keywords
        .chunks(size)
        .enumerate()
        .map(|(index, chunk)| Batch {
            index,
            total,
            keywords: chunk.to_vec(),
        })
        .collect()
}
