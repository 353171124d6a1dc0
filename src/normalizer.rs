/// Canonical comparison form of a product string: lowercased, with every
/// quote, apostrophe and whitespace character removed.
///
/// `Perno 1/4" x 2"`, `1/4x2` and `1/4 x 2` all collapse to `1/4x2`.
/// Only used for matching, never for display.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '"' | '\'') && !c.is_whitespace())
        .collect()
}
