pub mod answer;
pub mod engine;
pub mod timer;

pub use answer::{expected_answer, is_blank, judge, normalize};
pub use engine::{Advance, Completion, QuizEngine, QuizPhase, FEEDBACK_DELAY};
pub use timer::AdvanceTimer;
