// src/utils/sanitize.rs

use std::collections::HashSet;

/// Strips all markup from user-written text and trims it.
/// Script and style bodies are dropped along with their tags.
///
/// The result is HTML-safe text: `&`, `<` and `>` come back as entities
/// (`"A & B"` is stored as `"A &amp; B"`), so it can be rendered without escaping again.
pub fn plain_text(input: &str) -> String {
    ammonia::Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(input)
        .to_string()
        .trim()
        .to_string()
}
