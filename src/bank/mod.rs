pub mod core;
pub mod selector;

// Re-export the main types for convenience
pub use core::{QuestionBank, VocabularyEntry};
pub use selector::{CategorySelector, EntrySelector, RandomSelector};
