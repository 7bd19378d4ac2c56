//! Input utilities for the single-line message field.

/// Sanitize pasted or typed text before it reaches the input line.
///
/// Tabs become four spaces; all other control characters are dropped,
/// newlines included (Enter submits, so the field is single-line).
pub fn sanitize_line(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            _ if c.is_control() => {}
            _ => sanitized.push(c),
        }
    }

    sanitized
}
