use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::ExistingRecord;
use super::normalize::{normalize, word_prefix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixDepth {
    Three,
    Two,
    One,
}

impl PrefixDepth {
    pub const ALL: [PrefixDepth; 3] = [Self::Three, Self::Two, Self::One];

    pub const fn words(self) -> usize {
        match self {
            Self::Three => 3,
            Self::Two => 2,
            Self::One => 1,
        }
    }

    /// Occurrences an entry needs before it may be suggested.
    pub const fn min_count(self) -> u32 {
        match self {
            Self::Three => 1,
            Self::Two => 2,
            Self::One => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionEntry {
    pub category_id: String,
    pub count: u32,
}

/// Prefix to category tallies, one map per prefix depth.
///
/// The first category seen for a prefix owns the entry. Later records with the
/// same prefix bump the count only when they agree with it; records carrying
/// another category are dropped rather than tallied separately.
#[derive(Debug, Default)]
pub struct SuggestionTable {
    three: HashMap<String, SuggestionEntry>,
    two: HashMap<String, SuggestionEntry>,
    one: HashMap<String, SuggestionEntry>,
}

impl SuggestionTable {
    pub fn entry(&self, depth: PrefixDepth, prefix: &str) -> Option<&SuggestionEntry> {
        self.tier(depth).get(prefix)
    }

    /// Category for `normalized` at `depth`, if the entry meets the depth's
    /// occurrence threshold.
    pub fn suggest(&self, depth: PrefixDepth, normalized: &str) -> Option<&SuggestionEntry> {
        let prefix = word_prefix(normalized, depth.words())?;
        self.entry(depth, &prefix)
            .filter(|entry| entry.count >= depth.min_count())
    }

    pub fn len(&self, depth: PrefixDepth) -> usize {
        self.tier(depth).len()
    }

    pub fn is_empty(&self) -> bool {
        self.three.is_empty() && self.two.is_empty() && self.one.is_empty()
    }

    fn tier(&self, depth: PrefixDepth) -> &HashMap<String, SuggestionEntry> {
        match depth {
            PrefixDepth::Three => &self.three,
            PrefixDepth::Two => &self.two,
            PrefixDepth::One => &self.one,
        }
    }

    fn tier_mut(&mut self, depth: PrefixDepth) -> &mut HashMap<String, SuggestionEntry> {
        match depth {
            PrefixDepth::Three => &mut self.three,
            PrefixDepth::Two => &mut self.two,
            PrefixDepth::One => &mut self.one,
        }
    }

    fn record(&mut self, depth: PrefixDepth, prefix: String, category_id: &str) {
        match self.tier_mut(depth).entry(prefix) {
            Entry::Vacant(slot) => {
                slot.insert(SuggestionEntry {
                    category_id: category_id.to_string(),
                    count: 1,
                });
            }
            Entry::Occupied(mut slot) => {
                let incumbent = slot.get_mut();
                if incumbent.category_id == category_id {
                    incumbent.count += 1;
                }
            }
        }
    }
}

pub fn build_suggestions(records: &[ExistingRecord]) -> SuggestionTable {
    let mut table = SuggestionTable::default();
    for record in records {
        let Some(category_id) = record.category_id.as_deref() else {
            continue;
        };
        let normalized = normalize(&record.description);
        for depth in PrefixDepth::ALL {
            if let Some(prefix) = word_prefix(&normalized, depth.words()) {
                table.record(depth, prefix, category_id);
            }
        }
    }
    table
}
