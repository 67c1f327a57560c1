use serde_json::Value;

const INDENT: &str = "  ";
const GAP: &str = "  ";
/// Narrowest a table column may shrink to before the table gives way to blocks.
const MIN_COLUMN_WIDTH: usize = 8;
const DEFAULT_WIDTH: usize = 120;
const NARROWEST_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    name: &'a str,
    align: Align,
}

impl<'a> Column<'a> {
    pub const fn left(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Left,
        }
    }

    pub const fn right(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Right,
        }
    }

    fn floor(&self) -> usize {
        char_len(self.name).max(MIN_COLUMN_WIDTH)
    }

    fn pad(&self, text: &str, width: usize) -> String {
        let fill = " ".repeat(width.saturating_sub(char_len(text)));
        match self.align {
            Align::Left => format!("{text}{fill}"),
            Align::Right => format!("{fill}{text}"),
        }
    }
}

/// Width from `COLUMNS`, never narrower than 40.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_WIDTH)
        .max(NARROWEST_WIDTH)
}

pub fn json_str<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

pub fn json_i64(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

/// Money with two decimals; amounts arrive as JSON numbers.
pub fn format_amount(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_f64)
        .map_or_else(|| "-".to_string(), |amount| format!("{amount:.2}"))
}

/// `label  value` lines with every value starting in the same column.
pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries.iter().map(|(label, _)| char_len(label)).max();
    let Some(label_width) = label_width else {
        return Vec::new();
    };
    let lead = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| {
            let fill = " ".repeat(label_width - char_len(label));
            format!("{lead}{label}{fill}{GAP}{value}")
        })
        .collect()
}

/// Renders `rows` as an aligned table no wider than `max_width`, wrapping long
/// cells. When even the narrowest layout does not fit, each row becomes a
/// labelled block instead.
pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let spacing = INDENT.len() + GAP.len() * (columns.len() - 1);
    let floors = columns.iter().map(Column::floor).collect::<Vec<usize>>();
    let natural = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            rows.iter()
                .map(|row| cell(row, index))
                .map(char_len)
                .fold(char_len(column.name), usize::max)
        })
        .collect::<Vec<usize>>();

    match fit_widths(&natural, &floors, max_width.saturating_sub(spacing)) {
        Some(widths) => render_table(columns, rows, &widths),
        None => render_blocks(columns, rows, block_label),
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", String::as_str)
}

/// Caps every column at one shared width, lowered until the table fits.
/// Columns never go below their floor; `None` means even the floors overflow.
fn fit_widths(natural: &[usize], floors: &[usize], budget: usize) -> Option<Vec<usize>> {
    if natural.len() != floors.len() || floors.iter().sum::<usize>() > budget {
        return None;
    }

    let capped = |cap: usize| {
        natural
            .iter()
            .zip(floors)
            .map(|(natural, floor)| (*natural).max(*floor).min(cap.max(*floor)))
            .collect::<Vec<usize>>()
    };

    let widest = natural.iter().chain(floors).copied().max().unwrap_or(0);
    (0..=widest)
        .rev()
        .map(capped)
        .find(|widths| widths.iter().sum::<usize>() <= budget)
}

fn render_table(columns: &[Column<'_>], rows: &[Vec<String>], widths: &[usize]) -> Vec<String> {
    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let mut lines = vec![table_line(columns, &header, widths)];

    for row in rows {
        let wrapped = widths
            .iter()
            .enumerate()
            .map(|(index, width)| wrap_text(cell(row, index), *width))
            .collect::<Vec<Vec<String>>>();
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

        for line in 0..height {
            let cells = wrapped
                .iter()
                .map(|pieces| pieces.get(line).cloned().unwrap_or_default())
                .collect::<Vec<String>>();
            lines.push(table_line(columns, &cells, widths));
        }
    }

    lines
}

fn table_line(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let padded = columns
        .iter()
        .zip(cells.iter().zip(widths))
        .map(|(column, (text, width))| column.pad(text, *width))
        .collect::<Vec<String>>()
        .join(GAP);
    format!("{INDENT}{padded}").trim_end().to_string()
}

/// Greedy word wrap. A word wider than `width` is cut into `width`-char pieces.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 || char_len(text) <= width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = char_len(word);
        if current_len > 0 && current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
            continue;
        }
        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        for ch in word.chars() {
            if current_len == width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(ch);
            current_len += 1;
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let labels = columns
        .iter()
        .map(|column| format!("{}:", column.name))
        .collect::<Vec<String>>();

    rows.iter()
        .enumerate()
        .flat_map(|(index, row)| {
            let entries = labels
                .iter()
                .enumerate()
                .map(|(column, label)| (label.as_str(), cell(row, column).to_string()))
                .collect::<Vec<(&str, String)>>();
            let separator = (index > 0).then(String::new);
            separator
                .into_iter()
                .chain(std::iter::once(format!("{INDENT}{block_label} {}:", index + 1)))
                .chain(key_value_rows(&entries, INDENT.len() * 2))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        Column, fit_widths, format_amount, key_value_rows, render_table_or_blocks, wrap_text,
    };

    fn payee_row() -> Vec<Vec<String>> {
        vec![vec![
            "WHOLE FOODS MARKET 10293 AUSTIN TX".to_string(),
            "-1234.56".to_string(),
        ]]
    }

    #[test]
    fn amounts_render_with_two_decimals() {
        assert_eq!(format_amount(Some(&json!(-42.5))), "-42.50");
        assert_eq!(format_amount(Some(&json!(1500))), "1500.00");
        assert_eq!(format_amount(Some(&json!("12"))), "-");
        assert_eq!(format_amount(None), "-");
    }

    #[test]
    fn key_value_values_share_a_column() {
        let rows = key_value_rows(
            &[
                ("Checked:", "3".to_string()),
                ("Duplicates:", "1".to_string()),
            ],
            2,
        );
        assert_eq!(rows, vec!["  Checked:     3", "  Duplicates:  1"]);
        assert!(key_value_rows(&[], 2).is_empty());
    }

    #[test]
    fn wide_terminal_keeps_each_row_on_one_line() {
        let columns = [Column::left("Description"), Column::right("Amount")];
        let rendered = render_table_or_blocks(&columns, &payee_row(), 80, "Row");

        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].starts_with("  Description"));
        assert!(rendered[1].contains("WHOLE FOODS MARKET 10293 AUSTIN TX"));
        assert!(rendered[1].ends_with("-1234.56"));
    }

    #[test]
    fn tight_terminal_wraps_cells_onto_extra_lines() {
        let columns = [Column::left("Description"), Column::right("Amount")];
        let rendered = render_table_or_blocks(&columns, &payee_row(), 30, "Row");

        assert!(rendered.len() > 2);
        assert!(rendered.iter().all(|line| line.chars().count() <= 30));
        let joined = rendered.join(" ");
        for word in ["WHOLE", "FOODS", "MARKET", "10293", "AUSTIN", "TX", "-1234.56"] {
            assert!(joined.contains(word), "{word} went missing");
        }
    }

    #[test]
    fn table_that_cannot_fit_becomes_numbered_blocks() {
        let columns = [
            Column::left("Date"),
            Column::left("Description"),
            Column::right("Amount"),
            Column::left("Suggested"),
        ];
        let rows = vec![
            vec![
                "2024-01-11".to_string(),
                "Coffee".to_string(),
                "-4.00".to_string(),
                "Dining".to_string(),
            ],
            vec![
                "2024-01-12".to_string(),
                "Payroll".to_string(),
                "1500.00".to_string(),
                String::new(),
            ],
        ];

        let rendered = render_table_or_blocks(&columns, &rows, 40, "Row");
        assert_eq!(rendered[0], "  Row 1:");
        assert_eq!(rendered[1], "    Date:         2024-01-11");
        assert!(rendered.contains(&String::new()));
        assert!(rendered.contains(&"  Row 2:".to_string()));
        assert!(rendered.contains(&"    Amount:       1500.00".to_string()));
    }

    #[test]
    fn fitting_lowers_a_shared_cap_but_never_below_floors() {
        let fitted = fit_widths(&[20, 12], &[8, 10], 19);
        assert!(fitted.is_some());
        if let Some(widths) = fitted {
            assert_eq!(widths, vec![9, 10]);
        }

        assert_eq!(fit_widths(&[5, 30], &[8, 8], 40), Some(vec![8, 30]));
        assert_eq!(fit_widths(&[20, 12], &[8, 10], 17), None);
    }

    #[test]
    fn wrapping_cuts_long_words_on_char_boundaries() {
        assert_eq!(
            wrap_text("café crème brûlée", 5),
            vec!["café", "crème", "brûlé", "e"]
        );
        assert_eq!(wrap_text("", 4), vec![String::new()]);
    }
}
