//! Output truncation for text sent to the model or over the wire

/// Largest index `<= index` that lies on a char boundary of `s`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Cut `text` to at most `max_bytes` bytes on a char boundary, appending a
/// notice with the original size when anything was dropped.
pub fn truncate_chars(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let end = floor_char_boundary(text, max_bytes);
    format!(
        "{}\n[truncated: showed {} of {} bytes]",
        &text[..end],
        end,
        text.len()
    )
}
