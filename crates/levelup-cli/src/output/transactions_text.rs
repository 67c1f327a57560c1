use std::io;

use serde_json::Value;

use super::format::{
    Column, format_amount, json_i64, json_str, key_value_rows, render_table_or_blocks,
    terminal_width,
};

pub fn render_import(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .ok_or_else(|| io::Error::other("transactions import output requires summary"))?;
    let skipped = data
        .get("skipped")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("transactions import output requires skipped"))?;

    let mut lines = vec![json_str(data, "message").to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Rows read:", json_i64(summary, "rows_read").to_string()),
            ("Inserted:", json_i64(summary, "inserted").to_string()),
            (
                "Skipped duplicates:",
                json_i64(summary, "skipped_duplicates").to_string(),
            ),
            (
                "Categories created:",
                json_i64(summary, "categories_created").to_string(),
            ),
        ],
        2,
    ));

    if !skipped.is_empty() {
        let columns = [
            Column::right("Row"),
            Column::left("Date"),
            Column::left("Description"),
            Column::right("Amount"),
            Column::left("Matches"),
        ];
        let table_rows = skipped
            .iter()
            .map(|row| {
                vec![
                    json_i64(row, "row").to_string(),
                    json_str(row, "date").to_string(),
                    json_str(row, "description").to_string(),
                    format_amount(row.get("amount")),
                    json_str(row, "existing_transaction_id").to_string(),
                ]
            })
            .collect::<Vec<Vec<String>>>();

        lines.push(String::new());
        lines.push("Skipped rows:".to_string());
        lines.extend(render_table_or_blocks(
            &columns,
            &table_rows,
            terminal_width(),
            "Row",
        ));
    }

    Ok(lines.join("\n"))
}

pub fn render_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("transactions list output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No transactions found.",
            "",
            "Import a batch first:",
            "  1. levelup check <path>",
            "  2. levelup transactions import <path>",
        ]
        .join("\n"));
    }

    let columns = [
        Column::left("Date"),
        Column::left("Description"),
        Column::right("Amount"),
        Column::left("Category"),
        Column::left("Account"),
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                json_str(row, "posted_at").to_string(),
                json_str(row, "description").to_string(),
                format_amount(row.get("amount")),
                dash_if_empty(json_str(row, "category_name")),
                dash_if_empty(json_str(row, "account_id")),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![
        format!(
            "Transactions ({} shown, limit {}):",
            rows.len(),
            json_i64(data, "limit")
        ),
        String::new(),
    ];
    lines.extend(render_table_or_blocks(
        &columns,
        &table_rows,
        terminal_width(),
        "Transaction",
    ));
    Ok(lines.join("\n"))
}

fn dash_if_empty(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
