use super::index::RecordIndex;
use super::normalize::normalize;
use super::suggestions::{PrefixDepth, SuggestionTable};
use super::{Candidate, MatchKey};

/// Inclusive tolerance, in days, between a candidate and a stored duplicate.
pub const DUPLICATE_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    Exact,
    Prefix3,
    Prefix2,
    Prefix1,
}

impl SuggestionSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Prefix3 => "prefix3",
            Self::Prefix2 => "prefix2",
            Self::Prefix1 => "prefix1",
        }
    }

    const fn from_depth(depth: PrefixDepth) -> Self {
        match depth {
            PrefixDepth::Three => Self::Prefix3,
            PrefixDepth::Two => Self::Prefix2,
            PrefixDepth::One => Self::Prefix1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub is_duplicate: bool,
    pub existing_id: Option<String>,
    pub existing_category_id: Option<String>,
    pub suggested_category_id: Option<String>,
    pub suggestion_source: Option<SuggestionSource>,
}

pub fn match_candidate(
    candidate: &Candidate,
    index: &RecordIndex<'_>,
    suggestions: &SuggestionTable,
) -> MatchOutcome {
    let key = MatchKey::new(&candidate.description, candidate.amount);
    let in_window = index
        .lookup(&key)
        .iter()
        .filter(|record| {
            (candidate.date - record.date).num_days().abs() <= DUPLICATE_WINDOW_DAYS
        })
        .copied()
        .collect::<Vec<_>>();

    let mut outcome = MatchOutcome::default();
    if let Some(first) = in_window.first() {
        outcome.is_duplicate = true;
        outcome.existing_id = Some(first.id.clone());
        outcome.existing_category_id = first.category_id.clone();
    }

    if let Some(category_id) = in_window
        .iter()
        .find_map(|record| record.category_id.as_ref())
    {
        outcome.suggested_category_id = Some(category_id.clone());
        outcome.suggestion_source = Some(SuggestionSource::Exact);
        return outcome;
    }

    let normalized = normalize(&candidate.description);
    for depth in PrefixDepth::ALL {
        if let Some(entry) = suggestions.suggest(depth, &normalized) {
            outcome.suggested_category_id = Some(entry.category_id.clone());
            outcome.suggestion_source = Some(SuggestionSource::from_depth(depth));
            break;
        }
    }

    outcome
}
