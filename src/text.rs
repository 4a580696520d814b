//! Whitespace and case normalisation shared by every matcher.
//!
//! PDF text extraction inserts irregular spacing (double spaces, stray line
//! breaks inside names). Every regex in the vote parser runs over text that
//! has been through [`norm`] first, so patterns can assume single spaces.

/// Collapse every whitespace run to a single space and trim.
pub fn norm(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`norm`], then lowercase.
pub fn norm_lower(s: &str) -> String {
    norm(s).to_lowercase()
}

/// [`norm`] over an optional input; `None` yields the empty string.
pub fn norm_opt(s: Option<&str>) -> String {
    s.map(norm).unwrap_or_default()
}

/// Largest char boundary `<= idx` (clamped to `s.len()`).
pub(crate) fn floor_boundary(s: &str, idx: usize) -> usize {
    let mut i = idx.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Byte offset `n` characters before byte offset `pos`, clamped to 0.
pub(crate) fn chars_before(s: &str, pos: usize, n: usize) -> usize {
    let pos = floor_boundary(s, pos);
    if n == 0 {
        return pos;
    }
    s[..pos]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset `n` characters after byte offset `pos`, clamped to `s.len()`.
pub(crate) fn chars_after(s: &str, pos: usize, n: usize) -> usize {
    let pos = floor_boundary(s, pos);
    s[pos..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| pos + i)
        .unwrap_or(s.len())
}
