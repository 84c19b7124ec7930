//! Delimiter splitting with the legacy wire semantics.

/// Split `s` on `sep`, discarding trailing empty pieces.
///
/// A string without any separator yields itself as the only piece, even
/// when empty. A string made only of separators yields no pieces.
pub fn split_fields(s: &str, sep: char) -> Vec<&str> {
    if !s.contains(sep) {
        return vec![s];
    }
    let mut pieces: Vec<&str> = s.split(sep).collect();
    while pieces.last().is_some_and(|p| p.is_empty()) {
        pieces.pop();
    }
    pieces
}
