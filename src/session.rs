use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Question counts offered by the home screen.
pub const QUESTION_COUNT_CHOICES: [usize; 2] = [5, 10];

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
pub enum Language {
    #[serde(rename = "EN")]
    #[strum(serialize = "EN")]
    En,
    #[serde(rename = "FR")]
    #[strum(serialize = "FR")]
    Fr,
}

impl Language {
    pub fn other(self) -> Self {
        match self {
            Language::En => Language::Fr,
            Language::Fr => Language::En,
        }
    }

    /// Name of the language written in that language.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "Français",
        }
    }
}

/// Settings for one quiz run.
///
/// `target_language` is informational: the direction of translation is
/// derived from `source_language` alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    pub source_language: Language,
    pub target_language: Language,
    pub question_count: usize,
}

impl QuizConfig {
    pub fn new(source_language: Language, target_language: Language, question_count: usize) -> Self {
        Self {
            source_language,
            target_language,
            question_count,
        }
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        if self.question_count == 0 {
            return Err(QuizError::InvalidConfiguration {
                requested: self.question_count,
            });
        }
        Ok(())
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self::new(Language::En, Language::Fr, QUESTION_COUNT_CHOICES[0])
    }
}

/// Outcome of judging one submitted answer, shown to the user while the
/// engine waits to advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub is_correct: bool,
    pub expected_answer: String,
}

/// Summary of a completed quiz run, as persisted in the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "total")]
    pub total_questions: usize,
    #[serde(rename = "correct")]
    pub correct_count: usize,
    pub source_language: Language,
    pub target_language: Language,
}

impl SessionRecord {
    pub fn score_percent(&self) -> u32 {
        crate::util::round_percent(self.correct_count, self.total_questions)
    }
}
