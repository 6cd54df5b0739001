// Output formatting: terminal display and HTML report generation.

pub mod html;
pub mod terminal;

/// Format a percentage to two decimal places. NaN stays visibly "NaN" so a
/// zero-token row is never mistaken for 0% churn.
pub fn format_percent(pct: f64) -> String {
    if pct.is_nan() {
        "NaN".to_string()
    } else {
        format!("{pct:.2}")
    }
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Respects UTF-8 character boundaries, so it never panics on accented
/// letters or other multi-byte characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
