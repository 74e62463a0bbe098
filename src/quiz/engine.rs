use chrono::Utc;
use rand::RngCore;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::answer::{expected_answer, is_blank, judge};
use super::timer::AdvanceTimer;
use crate::bank::{QuestionBank, VocabularyEntry};
use crate::error::{PersistenceError, QuizError};
use crate::history::SessionStore;
use crate::session::{Feedback, Language, QuizConfig, SessionRecord};

/// How long feedback stays on screen before the quiz moves on.
pub const FEEDBACK_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    NotStarted,
    InProgress,
    AwaitingAdvance,
    Finished,
}

/// Result of moving past an answered question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The quiz moved to the question at this index.
    NextQuestion(usize),
    /// The last question was judged; the run is over.
    Finished(SessionRecord),
}

/// Result of handing the finished run to the history store.
#[derive(Debug)]
pub enum Completion {
    Saved,
    /// The record could not be persisted; it is still available through
    /// [`QuizEngine::record`].
    SaveFailed(PersistenceError),
    /// This run was already handed to the store.
    AlreadySaved,
    NotFinished,
}

/// State machine for one quiz run at a time.
#[derive(Debug)]
pub struct QuizEngine {
    phase: QuizPhase,
    config: QuizConfig,
    questions: Vec<VocabularyEntry>,
    current_index: usize,
    score: usize,
    last_feedback: Option<Feedback>,
    record: Option<SessionRecord>,
    saved: bool,
    advance_timer: AdvanceTimer,
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizEngine {
    pub fn new() -> Self {
        Self {
            phase: QuizPhase::NotStarted,
            config: QuizConfig::default(),
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            last_feedback: None,
            record: None,
            saved: false,
            advance_timer: AdvanceTimer::new(),
        }
    }

    /// Begin a new run, discarding any run in progress.
    ///
    /// The question count is capped to the bank size and the capped count is
    /// used for scoring and for the session record.
    pub fn start(&mut self, config: QuizConfig, bank: &QuestionBank) -> Result<(), QuizError> {
        self.start_with_rng(config, bank, &mut rand::thread_rng())
    }

    pub fn start_with_rng(
        &mut self,
        config: QuizConfig,
        bank: &QuestionBank,
        rng: &mut dyn RngCore,
    ) -> Result<(), QuizError> {
        config.validate()?;
        if bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }

        let questions = bank.draw_random_with(config.question_count, rng);
        let question_count = questions.len();

        self.config = QuizConfig {
            question_count,
            ..config
        };
        self.questions = questions;
        self.current_index = 0;
        self.score = 0;
        self.last_feedback = None;
        self.record = None;
        self.saved = false;
        self.advance_timer.cancel();
        self.phase = QuizPhase::InProgress;

        debug!(
            source = %self.config.source_language,
            requested = config.question_count,
            question_count,
            "quiz started"
        );
        Ok(())
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// Configuration of the current run, with the capped question count.
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn questions(&self) -> &[VocabularyEntry] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn current_question(&self) -> Option<&VocabularyEntry> {
        match self.phase {
            QuizPhase::InProgress | QuizPhase::AwaitingAdvance => {
                self.questions.get(self.current_index)
            }
            _ => None,
        }
    }

    /// `(question number, question count)` for display, one-based.
    pub fn progress(&self) -> (usize, usize) {
        let shown = (self.current_index + 1).min(self.question_count());
        (shown, self.question_count())
    }

    pub fn expected_answer(&self) -> Option<&str> {
        self.current_question()
            .map(|q| expected_answer(q, self.config.source_language))
    }

    /// Question text for the current entry.
    pub fn prompt(&self) -> Option<String> {
        let question = self.current_question()?;
        Some(match self.config.source_language {
            Language::En => format!("Traduisez en français: {}", question.english),
            Language::Fr => format!("Translate to English: {}", question.french),
        })
    }

    pub fn last_feedback(&self) -> Option<&Feedback> {
        self.last_feedback.as_ref()
    }

    /// Feedback to display while waiting to advance.
    pub fn pending_feedback(&self) -> Option<&Feedback> {
        match self.phase {
            QuizPhase::AwaitingAdvance => self.last_feedback.as_ref(),
            _ => None,
        }
    }

    /// The session record, once the last question has been judged.
    pub fn record(&self) -> Option<&SessionRecord> {
        self.record.as_ref()
    }

    pub fn has_started(&self) -> bool {
        self.phase != QuizPhase::NotStarted
    }

    pub fn has_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    pub fn is_advance_pending(&self) -> bool {
        self.advance_timer.is_pending()
    }

    /// Judge `text` against the current question.
    ///
    /// Returns `None` without touching any state when the answer is blank or
    /// no question is awaiting an answer.
    pub fn submit_answer(&mut self, text: &str, now: Instant) -> Option<Feedback> {
        if self.phase != QuizPhase::InProgress || is_blank(text) {
            return None;
        }

        let expected = self.expected_answer()?.to_string();
        let is_correct = judge(&expected, text);
        if is_correct {
            self.score += 1;
        }

        let feedback = Feedback {
            is_correct,
            expected_answer: expected,
        };
        self.last_feedback = Some(feedback.clone());
        self.phase = QuizPhase::AwaitingAdvance;
        self.advance_timer.schedule(now, FEEDBACK_DELAY);

        debug!(
            index = self.current_index,
            is_correct,
            score = self.score,
            "answer judged"
        );
        Some(feedback)
    }

    /// Advance when the feedback delay has elapsed.
    pub fn on_tick(&mut self, now: Instant) -> Option<Advance> {
        if self.advance_timer.take_due(now) {
            self.advance()
        } else {
            None
        }
    }

    /// Move past the judged question immediately.
    ///
    /// Only valid while awaiting advance; otherwise returns `None`.
    pub fn advance(&mut self) -> Option<Advance> {
        if self.phase != QuizPhase::AwaitingAdvance {
            return None;
        }
        self.advance_timer.cancel();

        if self.current_index + 1 < self.question_count() {
            self.current_index += 1;
            self.phase = QuizPhase::InProgress;
            return Some(Advance::NextQuestion(self.current_index));
        }

        let record = SessionRecord {
            timestamp: Utc::now(),
            total_questions: self.question_count(),
            correct_count: self.score,
            source_language: self.config.source_language,
            target_language: self.config.target_language,
        };
        self.record = Some(record.clone());
        self.phase = QuizPhase::Finished;

        info!(
            correct = record.correct_count,
            total = record.total_questions,
            "quiz finished"
        );
        Some(Advance::Finished(record))
    }

    /// Hand the finished run to `store`, at most once per run.
    pub fn finish(&mut self, store: &dyn SessionStore) -> Completion {
        let Some(record) = self.record.as_ref() else {
            return Completion::NotFinished;
        };
        if self.saved {
            return Completion::AlreadySaved;
        }
        // A failed save is not retried: the run is complete either way.
        self.saved = true;

        match store.append(record) {
            Ok(()) => Completion::Saved,
            Err(e) => {
                warn!(error = %e, "unable to save quiz session");
                Completion::SaveFailed(e)
            }
        }
    }

    /// Cancel any scheduled advance. Call when the owning view goes away.
    pub fn teardown(&mut self) {
        self.advance_timer.cancel();
    }
}

impl Drop for QuizEngine {
    fn drop(&mut self) {
        self.teardown();
    }
}
