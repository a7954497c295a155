//! Per-page run history.

use crate::record::MetricsRecord;

/// Ordered, append-only list of completed runs for one page.
///
/// Records stay in the order they were appended. Nothing is deduplicated and
/// there is no capacity bound; the only way to drop records is [`clear`].
///
/// [`clear`]: History::clear
#[derive(Debug, Clone, Default)]
pub struct History {
    records: Vec<MetricsRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at the end and return it.
    pub fn append(&mut self, record: MetricsRecord) -> &MetricsRecord {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[MetricsRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&MetricsRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricsRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a MetricsRecord;
    type IntoIter = std::slice::Iter<'a, MetricsRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
