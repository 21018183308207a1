//! # Text Wrapping
//!
//! Greedy word wrap against a font's measured widths.
//!
//! Lines only break between words. A word wider than the budget gets a
//! line of its own and overflows; it is never hyphenated or truncated.
//! Explicit newlines start a fresh line, and blank lines between them are
//! dropped so free-text answers never open vertical gaps.

use crate::font::TextMeasure;

/// Wrap `text` into lines no wider than `max_width` at `font_size`.
///
/// Always returns at least one line; empty or blank input yields `[""]` so
/// callers can reserve one line height unconditionally.
pub fn wrap_text<M>(text: &str, measure: &M, font_size: f64, max_width: f64) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();

    for segment in text.lines() {
        let mut current = String::new();
        for word in segment.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if measure.width_of_text_at_size(&candidate, font_size) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
