//! Text normalization shared by the extractors and the collection loop.
//!
//! Lengths are counted in characters, not bytes, so thresholds behave the
//! same for non-ASCII posts.

/// Trims surrounding whitespace from rendered element text
pub fn normalize(text: &str) -> String {
    text.trim().to_string()
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Joins the normalized fragments longer than `min_chars` with newlines.
///
/// Rich-text bodies are often split across several nodes, so every
/// substantial fragment is kept, in order.
pub fn join_substantial<I, S>(fragments: I, min_chars: usize) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fragments
        .into_iter()
        .map(|fragment| normalize(fragment.as_ref()))
        .filter(|fragment| char_len(fragment) > min_chars)
        .collect::<Vec<_>>()
        .join("\n")
}

/// First non-blank line of raw element text longer than `min_chars`,
/// trimmed. Length counts the line as rendered, indentation included.
///
/// Used when no structural pattern located the body; titles and metadata
/// are usually short, so the first long line is the best guess at content.
pub fn first_substantial_line(raw: &str, min_chars: usize) -> Option<String> {
    raw.lines()
        .find(|line| !line.trim().is_empty() && char_len(line) > min_chars)
        .map(|line| line.trim().to_string())
}

/// Shortens text for log output
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Whether any marker occurs verbatim in the text
pub fn contains_any<S: AsRef<str>>(text: &str, markers: &[S]) -> bool {
    markers.iter().any(|marker| text.contains(marker.as_ref()))
}

/// Whether any marker occurs in the text, ignoring case
pub fn contains_any_ignore_case<S: AsRef<str>>(text: &str, markers: &[S]) -> bool {
    let lowered = text.to_lowercase();
    markers
        .iter()
        .any(|marker| lowered.contains(&marker.as_ref().to_lowercase()))
}
