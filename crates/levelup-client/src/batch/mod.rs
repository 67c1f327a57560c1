//! Incoming transaction batches: where they come from, how they are parsed,
//! and the validation every row must pass before any matching happens.

pub(crate) mod input;
pub(crate) mod parse;
pub(crate) mod validate;

use chrono::NaiveDate;

use crate::ClientError;
use crate::ClientResult;
use crate::contracts::types::BatchSummary;
use crate::matching::Candidate;

pub(crate) const REQUIRED_FIELDS: [&str; 3] = ["date", "description", "amount"];
pub(crate) const OPTIONAL_FIELDS: [&str; 1] = ["category"];

/// Days of history fetched on each side of the batch, wider than the
/// duplicate window so prefix suggestions see nearby activity too.
pub(crate) const FETCH_MARGIN_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub(crate) struct BatchRow {
    pub(crate) row: i64,
    pub(crate) candidate: Candidate,
    pub(crate) category: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct LoadedBatch {
    pub(crate) source: input::ResolvedSource,
    pub(crate) rows: Vec<BatchRow>,
    pub(crate) summary: BatchSummary,
}

impl LoadedBatch {
    /// Earliest and latest candidate dates, widened by [`FETCH_MARGIN_DAYS`]
    /// and held inside the four-digit years stored dates can take.
    pub(crate) fn fetch_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        let earliest = self.rows.iter().map(|row| row.candidate.date).min()?;
        let latest = self.rows.iter().map(|row| row.candidate.date).max()?;
        let margin = chrono::Duration::days(FETCH_MARGIN_DAYS);
        let floor = NaiveDate::from_ymd_opt(0, 1, 1).unwrap_or(NaiveDate::MIN);
        let ceiling = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX);

        let from = earliest.checked_sub_signed(margin).unwrap_or(floor).max(floor);
        let to = latest.checked_add_signed(margin).unwrap_or(ceiling).min(ceiling);
        Some((from, to))
    }
}

pub(crate) fn load(
    path: Option<String>,
    stdin_override: Option<String>,
    command: &str,
) -> ClientResult<LoadedBatch> {
    let source = input::resolve_source(path, stdin_override, command)?;
    let parsed = parse::parse_source(&source.content, command)?;
    if parsed.is_empty() {
        return Err(invalid_input_error(
            "The batch contains no transactions.",
            command,
        ));
    }
    let validated = validate::validate_rows(parsed)?;

    Ok(LoadedBatch {
        source,
        rows: validated.rows,
        summary: validated.summary,
    })
}

pub(crate) fn invalid_input_error(message: &str, command: &str) -> ClientError {
    ClientError::invalid_argument_with_recovery(
        message,
        vec![
            "Provide a JSON array or CSV input via path or stdin.".to_string(),
            format!("Run `levelup {command} --help` to confirm field requirements."),
        ],
    )
}

pub(crate) fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::load;

    #[test]
    fn fetch_window_pads_min_and_max_by_seven_days() {
        let loaded = load(
            None,
            Some(
                r#"[
                    {"date": "2024-01-12", "description": "A", "amount": -1},
                    {"date": "2024-01-05", "description": "B", "amount": 2.5},
                    {"date": "2024-01-20", "description": "C", "amount": 3}
                ]"#
                .to_string(),
            ),
            "check",
        );
        assert!(loaded.is_ok());
        if let Ok(batch) = loaded {
            let window = batch.fetch_window();
            assert!(window.is_some());
            if let Some((from, to)) = window {
                assert_eq!(super::format_iso_date(from), "2023-12-29");
                assert_eq!(super::format_iso_date(to), "2024-01-27");
            }
        }
    }

    #[test]
    fn fetch_window_stays_within_four_digit_years() {
        let loaded = load(
            None,
            Some(
                r#"[
                    {"date": "9999-12-30", "description": "Rent", "amount": -10},
                    {"date": "0000-01-02", "description": "Rent", "amount": -10}
                ]"#
                .to_string(),
            ),
            "check",
        );
        assert!(loaded.is_ok());
        if let Ok(batch) = loaded {
            let window = batch.fetch_window();
            assert!(window.is_some());
            if let Some((from, to)) = window {
                assert_eq!(super::format_iso_date(from), "0000-01-01");
                assert_eq!(super::format_iso_date(to), "9999-12-31");
            }
        }
    }

    #[test]
    fn empty_array_is_rejected() {
        let loaded = load(None, Some("[]".to_string()), "check");
        assert!(loaded.is_err());
        if let Err(error) = loaded {
            assert_eq!(error.code, "invalid_argument");
        }
    }
}
