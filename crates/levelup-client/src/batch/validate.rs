use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::batch::BatchRow;
use crate::batch::parse::ParsedRow;
use crate::contracts::types::{BatchIssue, BatchSummary};
use crate::matching::Candidate;
use crate::{ClientError, ClientResult};

const AMOUNT_EXAMPLE: &str = "number (e.g. -42.15)";

#[derive(Debug, Clone)]
pub(crate) struct ValidatedRows {
    pub(crate) rows: Vec<BatchRow>,
    pub(crate) summary: BatchSummary,
}

/// Validates every row and fails the whole batch if any row has an issue.
pub(crate) fn validate_rows(parsed_rows: Vec<ParsedRow>) -> ClientResult<ValidatedRows> {
    let total_rows = parsed_rows.len();
    let mut rows = Vec::new();
    let mut issues = Vec::new();

    for raw in parsed_rows {
        let mut row_issues = Vec::new();

        let date = validate_date(raw.row, raw.date, &mut row_issues);
        let description = validate_description(raw.row, raw.description, &mut row_issues);
        let amount = validate_amount(raw.row, raw.amount, &mut row_issues);
        let category = normalize_optional(raw.category);

        match (date, description, amount) {
            (Some(date), Some(description), Some(amount)) if row_issues.is_empty() => {
                rows.push(BatchRow {
                    row: raw.row,
                    candidate: Candidate {
                        date,
                        description,
                        amount,
                    },
                    category,
                });
            }
            _ => issues.extend(row_issues),
        }
    }

    let summary = BatchSummary {
        rows_read: total_rows as i64,
        rows_valid: rows.len() as i64,
        rows_invalid: issues
            .iter()
            .map(|issue| issue.row)
            .collect::<HashSet<i64>>()
            .len() as i64,
    };

    if !issues.is_empty() {
        return Err(ClientError::batch_validation_failed(summary, issues));
    }

    Ok(ValidatedRows { rows, summary })
}

fn validate_date(
    row: i64,
    value: Option<String>,
    issues: &mut Vec<BatchIssue>,
) -> Option<NaiveDate> {
    let Some(candidate) = normalize_optional(value) else {
        issues.push(missing_field(row, "date", "YYYY-MM-DD"));
        return None;
    };

    let parsed = if looks_like_iso_date(&candidate) {
        NaiveDate::parse_from_str(&candidate, "%Y-%m-%d").ok()
    } else {
        None
    };

    if parsed.is_none() {
        issues.push(BatchIssue {
            row,
            field: "date".to_string(),
            code: "invalid_date".to_string(),
            description: format!(
                "date must be a real calendar date in YYYY-MM-DD; got \"{candidate}\""
            ),
            expected: Some("YYYY-MM-DD".to_string()),
            received: Some(candidate),
        });
    }
    parsed
}

fn validate_description(
    row: i64,
    value: Option<String>,
    issues: &mut Vec<BatchIssue>,
) -> Option<String> {
    let normalized = normalize_optional(value);
    if normalized.is_none() {
        issues.push(missing_field(row, "description", "non-empty string"));
    }
    normalized
}

fn validate_amount(
    row: i64,
    value: Option<String>,
    issues: &mut Vec<BatchIssue>,
) -> Option<Decimal> {
    let Some(candidate) = normalize_optional(value) else {
        issues.push(missing_field(row, "amount", AMOUNT_EXAMPLE));
        return None;
    };

    let Ok(amount) = Decimal::from_str(candidate.trim_start_matches('+')) else {
        issues.push(BatchIssue {
            row,
            field: "amount".to_string(),
            code: "invalid_number".to_string(),
            description: format!("amount must be numeric; got \"{candidate}\""),
            expected: Some(AMOUNT_EXAMPLE.to_string()),
            received: Some(candidate),
        });
        return None;
    };

    Some(amount)
}

fn missing_field(row: i64, field: &str, expected: &str) -> BatchIssue {
    BatchIssue {
        row,
        field: field.to_string(),
        code: "missing_required_field".to_string(),
        description: format!("{field} must be present and non-empty."),
        expected: Some(expected.to_string()),
        received: Some(String::new()),
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn looks_like_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && [0usize, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|index| bytes[*index].is_ascii_digit())
}
