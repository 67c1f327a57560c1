use std::collections::HashMap;

use super::{ExistingRecord, MatchKey};

/// Existing records grouped by match key. Records sharing a key keep the
/// order they were supplied in.
#[derive(Debug, Default)]
pub struct RecordIndex<'a> {
    by_key: HashMap<MatchKey, Vec<&'a ExistingRecord>>,
}

impl<'a> RecordIndex<'a> {
    pub fn lookup(&self, key: &MatchKey) -> &[&'a ExistingRecord] {
        self.by_key.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn key_count(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

pub fn build_index(records: &[ExistingRecord]) -> RecordIndex<'_> {
    let mut by_key: HashMap<MatchKey, Vec<&ExistingRecord>> = HashMap::new();
    for record in records {
        let key = MatchKey::new(&record.description, record.amount);
        by_key.entry(key).or_default().push(record);
    }
    RecordIndex { by_key }
}
