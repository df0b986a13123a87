//! Local session title derivation from the first user query.

pub const DEFAULT_SESSION_TITLE: &str = "Analyse système";

const MAX_TITLE_CHARS: usize = 30;

/// First line of the query, truncated to a display-friendly length.
/// Falls back to the default title for empty input (attachment-only sends).
pub fn derive_title(query: &str) -> String {
    let first_line = query.lines().next().unwrap_or(query).trim();
    if first_line.is_empty() {
        return DEFAULT_SESSION_TITLE.to_string();
    }
    if first_line.chars().count() <= MAX_TITLE_CHARS {
        return first_line.to_string();
    }
    first_line.chars().take(MAX_TITLE_CHARS).collect::<String>() + "…"
}
