// src/grading/word_selection.rs

use std::collections::BTreeSet;

use crate::models::challenge::KeyWord;

/// Correct iff the clicked words are exactly the key words: same size, same members.
pub fn grade(key_words: &[KeyWord], selected: &BTreeSet<String>) -> bool {
    let keys: BTreeSet<&str> = key_words.iter().map(|k| k.word.as_str()).collect();

    selected.len() == keys.len() && selected.iter().all(|w| keys.contains(w.as_str()))
}
