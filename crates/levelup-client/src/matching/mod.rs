//! Duplicate detection and category suggestion over transactions that are
//! already in memory.
//!
//! Everything here is pure: callers fetch the existing records, build a
//! [`RecordIndex`] and a [`SuggestionTable`] once per batch, then run
//! [`match_candidate`] for every incoming row. Nothing is cached between
//! calls.

pub mod index;
pub mod matcher;
pub mod normalize;
pub mod suggestions;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

pub use index::{RecordIndex, build_index};
pub use matcher::{DUPLICATE_WINDOW_DAYS, MatchOutcome, SuggestionSource, match_candidate};
pub use normalize::normalize;
pub use suggestions::{PrefixDepth, SuggestionEntry, SuggestionTable, build_suggestions};

/// A transaction offered for checking. Never persisted by the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

/// A transaction already stored for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingRecord {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category_id: Option<String>,
    pub description: String,
}

/// Normalized description plus absolute amount at cent precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub description: String,
    pub amount: String,
}

impl MatchKey {
    pub fn new(description: &str, amount: Decimal) -> Self {
        Self {
            description: normalize(description),
            amount: format_cents(amount.abs()),
        }
    }
}

/// Formats an amount with exactly two decimals, rounding half away from zero.
pub fn format_cents(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
