use std::io;

use serde_json::Value;

use super::format::{
    Column, json_i64, json_str, key_value_rows, render_table_or_blocks, terminal_width,
};

pub fn render_add(data: &Value) -> io::Result<String> {
    let category = data
        .get("category")
        .ok_or_else(|| io::Error::other("categories add output requires category"))?;

    let mut lines = vec![json_str(data, "message").to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Id:", json_str(category, "category_id").to_string()),
            ("Name:", json_str(category, "name").to_string()),
            ("Created:", json_str(category, "created_at").to_string()),
        ],
        2,
    ));
    Ok(lines.join("\n"))
}

pub fn render_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("categories list output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No categories yet.",
            "",
            "Add one with:",
            "  levelup categories add <name>",
        ]
        .join("\n"));
    }

    let columns = [
        Column::left("Name"),
        Column::right("Transactions"),
        Column::left("Id"),
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                json_str(row, "name").to_string(),
                json_i64(row, "transaction_count").to_string(),
                json_str(row, "category_id").to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![format!("Categories ({}):", rows.len()), String::new()];
    lines.extend(render_table_or_blocks(
        &columns,
        &table_rows,
        terminal_width(),
        "Category",
    ));
    Ok(lines.join("\n"))
}
