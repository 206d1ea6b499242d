//! Textual rendering used when no candidate path matches.
//!
//! Best-effort only: the first non-blank line of the rendered response is
//! shown to the user as-is, with no guarantee that it is the answer.

use serde_json::Value;

/// Renders a whole response as display text.
///
/// Null and empty containers render as empty text. Strings render as their
/// raw content so embedded newlines become separate lines. Everything else
/// renders as compact JSON.
pub fn render_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) if items.is_empty() => String::new(),
        Value::Object(map) if map.is_empty() => String::new(),
        other => other.to_string(),
    }
}

/// Returns the first line that is not blank, trimmed.
pub fn first_non_blank_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}
