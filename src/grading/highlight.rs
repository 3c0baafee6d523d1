// src/grading/highlight.rs

//! Lenient matching of learner selections against target highlights.
//!
//! Selections made with a mouse or a touch drag routinely miss or overshoot by a
//! few characters, so a span counts as a hit when either text contains the other,
//! or when both start close together in the statement.

use crate::models::{challenge::HighlightTarget, submission::SelectedSpan};

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Character offset of the first occurrence of `needle` in `haystack`.
fn char_offset(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .find(needle)
        .map(|byte_idx| haystack[..byte_idx].chars().count())
}

/// Whether one selection counts as hitting one target.
///
/// The proximity rule accepts start offsets at most `min(len) / 2` characters apart,
/// boundary included. Spans without an explicit start use the first occurrence of
/// their text; targets that do not occur in the statement only match by containment.
pub fn span_matches(statement: &str, span: &SelectedSpan, target: &HighlightTarget) -> bool {
    if span.text.contains(&target.text) || target.text.contains(&span.text) {
        return true;
    }

    let span_start = span.start.or_else(|| char_offset(statement, &span.text));
    let target_start = char_offset(statement, &target.text);
    let (Some(span_start), Some(target_start)) = (span_start, target_start) else {
        return false;
    };

    let min_len = char_len(&span.text).min(char_len(&target.text));
    span_start
        .abs_diff(target_start)
        .checked_mul(2)
        .is_some_and(|distance| distance <= min_len)
}

/// Correct when at least one non-blank span hits at least one target.
pub fn grade(statement: &str, highlights: &[HighlightTarget], spans: &[SelectedSpan]) -> bool {
    spans
        .iter()
        .filter(|s| !s.text.trim().is_empty())
        .any(|span| {
            highlights
                .iter()
                .any(|target| span_matches(statement, span, target))
        })
}
