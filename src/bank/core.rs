use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::RngCore;
use serde::Deserialize;
use std::collections::HashSet;

use super::selector::{CategorySelector, EntrySelector, RandomSelector};
use crate::error::BankError;
use crate::session::Language;

static VOCAB_DIR: Dir = include_dir!("src/vocab");

/// Name of the vocabulary file bundled with the binary.
pub const DEFAULT_VOCABULARY: &str = "everyday";

/// One word pair shown as a 3D object.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub id: String,
    pub english: String,
    pub french: String,
    /// Opaque handle to the 3D asset for this object.
    pub render_ref: String,
    pub category: String,
}

impl VocabularyEntry {
    /// Surface form of this entry in `language`.
    pub fn term(&self, language: Language) -> &str {
        match language {
            Language::En => &self.english,
            Language::Fr => &self.french,
        }
    }
}

#[derive(Deserialize)]
struct VocabularyFile {
    #[allow(dead_code)]
    name: String,
    entries: Vec<VocabularyEntry>,
}

/// Fixed, ordered collection of vocabulary entries.
#[derive(Clone, Debug)]
pub struct QuestionBank {
    entries: Vec<VocabularyEntry>,
}

impl QuestionBank {
    /// Load a vocabulary file embedded at compile time.
    pub fn load(name: &str) -> Result<Self, BankError> {
        let file_name = format!("{name}.json");
        let file = VOCAB_DIR
            .get_file(&file_name)
            .ok_or_else(|| BankError::MissingData(file_name.clone()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| BankError::MissingData(file_name.clone()))?;

        let vocab: VocabularyFile =
            serde_json::from_str(contents).map_err(|source| BankError::Decode {
                file: file_name,
                source,
            })?;

        Self::from_entries(vocab.entries)
    }

    /// The bundled English/French bank.
    pub fn builtin() -> Result<Self, BankError> {
        Self::load(DEFAULT_VOCABULARY)
    }

    pub fn from_entries(entries: Vec<VocabularyEntry>) -> Result<Self, BankError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(BankError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&VocabularyEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// `min(n, len)` distinct entries in random order.
    pub fn draw_random(&self, n: usize) -> Vec<VocabularyEntry> {
        self.draw_random_with(n, &mut rand::thread_rng())
    }

    pub fn draw_random_with(&self, n: usize, rng: &mut dyn RngCore) -> Vec<VocabularyEntry> {
        RandomSelector.select_entries(self, n, rng)
    }

    /// Entries tagged with `category`, in bank order.
    pub fn by_category(&self, category: &str) -> Vec<VocabularyEntry> {
        CategorySelector::new(category).select_entries(self, self.len(), &mut rand::thread_rng())
    }

    /// Distinct categories in first-appearance order.
    pub fn categories(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.category.as_str())
            .unique()
            .collect()
    }
}
