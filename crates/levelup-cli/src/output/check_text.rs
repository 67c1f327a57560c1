use std::io;

use serde_json::Value;

use super::format::{
    Column, format_amount, json_i64, json_str, key_value_rows, render_table_or_blocks,
    terminal_width,
};

pub fn render_check(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .ok_or_else(|| io::Error::other("check output requires summary"))?;
    let window = data
        .get("window")
        .ok_or_else(|| io::Error::other("check output requires window"))?;
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("check output requires rows"))?;

    let source = match data.get("path").and_then(Value::as_str) {
        Some(path) => path.to_string(),
        None => "stdin".to_string(),
    };
    let mut entries = vec![("Source:", source)];
    if let Some(account_id) = data.get("account_id").and_then(Value::as_str) {
        entries.push(("Account:", account_id.to_string()));
    }
    entries.extend([
        ("Rows checked:", json_i64(summary, "rows_checked").to_string()),
        ("Duplicates:", json_i64(summary, "duplicates").to_string()),
        ("With suggestion:", json_i64(summary, "suggested").to_string()),
        (
            "Compared against:",
            format!(
                "{} stored transactions ({} to {})",
                json_i64(window, "existing_records"),
                json_str(window, "from"),
                json_str(window, "to")
            ),
        ),
    ]);

    let mut lines = vec![
        "Check complete. Nothing was written.".to_string(),
        String::new(),
    ];
    lines.extend(key_value_rows(&entries, 2));
    lines.push(String::new());
    lines.push("Rows:".to_string());
    lines.extend(render_check_rows(rows));

    if json_i64(summary, "duplicates") > 0 {
        lines.push(String::new());
        lines.push("To import without the duplicates:".to_string());
        lines.push("  levelup transactions import --skip-duplicates <path>".to_string());
    }

    Ok(lines.join("\n"))
}

fn render_check_rows(rows: &[Value]) -> Vec<String> {
    let columns = [
        Column::right("Row"),
        Column::left("Date"),
        Column::left("Description"),
        Column::right("Amount"),
        Column::left("Duplicate"),
        Column::left("Suggested"),
        Column::left("Source"),
    ];

    let table_rows = rows
        .iter()
        .map(|row| {
            let duplicate = row
                .get("is_duplicate")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            vec![
                json_i64(row, "row").to_string(),
                json_str(row, "date").to_string(),
                json_str(row, "description").to_string(),
                format_amount(row.get("amount")),
                if duplicate { "yes" } else { "no" }.to_string(),
                or_dash(row.get("suggested_category_name")),
                or_dash(row.get("suggestion_source")),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    render_table_or_blocks(&columns, &table_rows, terminal_width(), "Row")
}

fn or_dash(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_check;

    fn sample(duplicates: i64) -> serde_json::Value {
        json!({
            "account_id": "checking",
            "source": "file",
            "path": "rows.json",
            "window": {"from": "2024-01-05", "to": "2024-01-19", "existing_records": 3},
            "summary": {"rows_checked": 2, "duplicates": duplicates, "suggested": 1},
            "rows": [
                {
                    "row": 1, "date": "2024-01-12", "description": "TRADER JOES #123",
                    "amount": -42.5, "is_duplicate": duplicates > 0,
                    "suggested_category_name": "Groceries", "suggestion_source": "exact"
                },
                {
                    "row": 2, "date": "2024-01-12", "description": "Coffee",
                    "amount": -4, "is_duplicate": false,
                    "suggested_category_name": null, "suggestion_source": null
                }
            ]
        })
    }

    #[test]
    fn renders_summary_and_row_table() {
        let rendered = render_check(&sample(1));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Check complete. Nothing was written."));
            assert!(text.contains("Account:"));
            assert!(text.contains("3 stored transactions (2024-01-05 to 2024-01-19)"));
            assert!(text.contains("-42.50"));
            assert!(text.contains("Groceries"));
            assert!(text.contains("-4.00"));
            assert!(text.contains("--skip-duplicates"));
        }
    }

    #[test]
    fn import_hint_is_omitted_without_duplicates() {
        let rendered = render_check(&sample(0));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(!text.contains("--skip-duplicates"));
        }
    }

    #[test]
    fn missing_rows_is_an_error() {
        assert!(render_check(&json!({"summary": {}, "window": {}})).is_err());
    }
}
