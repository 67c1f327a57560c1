use levelup_client::ClientError;
use serde_json::Value;

use super::format::{json_i64, json_str};

/// Row issues listed inline before the recovery steps.
const MAX_LISTED_ISSUES: usize = 20;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    let issues = render_issues(error.data.as_ref());
    if !issues.is_empty() {
        lines.push(String::new());
        lines.push("Rows to fix:".to_string());
        lines.extend(issues);
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

fn render_issues(data: Option<&Value>) -> Vec<String> {
    let Some(issues) = data
        .and_then(|value| value.get("issues"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut lines = issues
        .iter()
        .take(MAX_LISTED_ISSUES)
        .map(|issue| {
            format!(
                "  Row {} ({}): {}",
                json_i64(issue, "row"),
                json_str(issue, "field"),
                json_str(issue, "description")
            )
        })
        .collect::<Vec<String>>();

    if issues.len() > MAX_LISTED_ISSUES {
        lines.push(format!(
            "  ...and {} more. Rerun with --json for the full list.",
            issues.len() - MAX_LISTED_ISSUES
        ));
    }
    lines
}
