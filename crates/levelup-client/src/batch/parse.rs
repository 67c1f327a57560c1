use std::collections::HashMap;

use serde_json::Value;

use crate::batch::{OPTIONAL_FIELDS, REQUIRED_FIELDS, invalid_input_error};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub(crate) struct ParsedRow {
    pub(crate) row: i64,
    pub(crate) date: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) amount: Option<String>,
    pub(crate) category: Option<String>,
}

pub(crate) fn parse_source(content: &str, command: &str) -> ClientResult<Vec<ParsedRow>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(invalid_input_error("Batch source is empty.", command));
    }

    if trimmed.starts_with('[') {
        return parse_json_array(trimmed, command);
    }

    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Err(ClientError::invalid_input_format(
            "JSON input must be a top-level array of transaction objects.",
            "json_non_array",
        ));
    }

    if looks_like_csv(trimmed) {
        return parse_csv(trimmed, command);
    }

    Err(ClientError::invalid_input_format(
        "Unsupported batch format. Provide a JSON array or CSV with headers.",
        "unknown",
    ))
}

fn parse_json_array(content: &str, command: &str) -> ClientResult<Vec<ParsedRow>> {
    let parsed = serde_json::from_str::<Value>(content).map_err(|_| {
        invalid_input_error("Invalid JSON input. Provide a valid JSON array.", command)
    })?;

    let Some(items) = parsed.as_array() else {
        return Err(invalid_input_error(
            "JSON input must be a top-level array of transaction objects.",
            command,
        ));
    };

    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            return Err(invalid_input_error(
                "JSON array entries must all be objects with transaction fields.",
                command,
            ));
        };

        rows.push(ParsedRow {
            row: (index as i64) + 1,
            date: read_optional_string(object.get("date")),
            description: read_optional_string(object.get("description")),
            amount: read_optional_string(object.get("amount")),
            category: read_optional_string(object.get("category")),
        });
    }

    Ok(rows)
}

fn parse_csv(content: &str, command: &str) -> ClientResult<Vec<ParsedRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| invalid_input_error("CSV header row is missing or unreadable.", command))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<String>>();

    if !headers_are_valid(&headers) {
        return Err(ClientError::batch_schema_mismatch(
            REQUIRED_FIELDS.iter().map(|name| name.to_string()).collect(),
            OPTIONAL_FIELDS.iter().map(|name| name.to_string()).collect(),
            headers,
        ));
    }

    let index_by_name = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index))
        .collect::<HashMap<String, usize>>();

    let mut rows = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let record = result_row
            .map_err(|_| invalid_input_error("CSV rows are malformed or not UTF-8.", command))?;

        rows.push(ParsedRow {
            row: (row_index as i64) + 1,
            date: value_for(&record, &index_by_name, "date"),
            description: value_for(&record, &index_by_name, "description"),
            amount: value_for(&record, &index_by_name, "amount"),
            category: value_for(&record, &index_by_name, "category"),
        });
    }

    Ok(rows)
}

fn value_for(
    record: &csv::StringRecord,
    index_by_name: &HashMap<String, usize>,
    field_name: &str,
) -> Option<String> {
    let index = index_by_name.get(field_name)?;
    record.get(*index).map(str::to_string)
}

fn read_optional_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        // Unquoted numbers go through f64, so `-42.50` prints as `-42.5`.
        // Quote the amount to keep its exact digits.
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn looks_like_csv(content: &str) -> bool {
    content
        .lines()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|first_line| first_line.contains(','))
}

fn headers_are_valid(actual_headers: &[String]) -> bool {
    let has_required = REQUIRED_FIELDS
        .iter()
        .all(|required| actual_headers.iter().any(|header| header == required));
    let all_known = actual_headers.iter().all(|header| {
        REQUIRED_FIELDS.contains(&header.as_str()) || OPTIONAL_FIELDS.contains(&header.as_str())
    });
    has_required && all_known
}
