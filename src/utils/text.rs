/// Cut `s` to at most `max_chars` characters, marking the cut with `...`.
#[must_use]
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", s[..idx].trim_end()),
        None => s.to_string(),
    }
}

/// Single-line preview of user or engine text for log fields.
#[must_use]
pub fn log_preview(s: &str) -> String {
    const PREVIEW_CHARS: usize = 60;
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_with_ellipsis(&flat, PREVIEW_CHARS)
}
