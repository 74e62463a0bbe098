//! Answer evaluation policy.
//!
//! Answers are compared after trimming and lowercasing both sides. There is
//! no fuzzy matching and accents are significant: "telephone" does not match
//! "téléphone".

use crate::bank::VocabularyEntry;
use crate::session::Language;

/// The answer expected for `entry` when the question is asked in `source`.
///
/// Direction is decided by the source language alone: an English prompt
/// expects French and a French prompt expects English.
pub fn expected_answer(entry: &VocabularyEntry, source: Language) -> &str {
    entry.term(source.other())
}

pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

pub fn judge(expected: &str, submitted: &str) -> bool {
    normalize(expected) == normalize(submitted)
}
