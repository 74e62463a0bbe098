use super::core::{QuestionBank, VocabularyEntry};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Trait for different question selection strategies
pub trait EntrySelector {
    /// Select up to `count` entries from the bank
    fn select_entries(
        &self,
        bank: &QuestionBank,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<VocabularyEntry>;
}

/// Uniform selection without replacement, shuffled
pub struct RandomSelector;

impl EntrySelector for RandomSelector {
    fn select_entries(
        &self,
        bank: &QuestionBank,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<VocabularyEntry> {
        // choose_multiple does not guarantee a random output order
        let mut picked: Vec<VocabularyEntry> = bank
            .entries()
            .choose_multiple(rng, count)
            .cloned()
            .collect();
        picked.shuffle(rng);
        picked
    }
}

/// Entries of a single category, in bank order
pub struct CategorySelector {
    category: String,
}

impl CategorySelector {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }
}

impl EntrySelector for CategorySelector {
    fn select_entries(
        &self,
        bank: &QuestionBank,
        count: usize,
        _rng: &mut dyn RngCore,
    ) -> Vec<VocabularyEntry> {
        bank.entries()
            .iter()
            .filter(|e| e.category == self.category)
            .take(count)
            .cloned()
            .collect()
    }
}
