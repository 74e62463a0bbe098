use std::sync::mpsc;
use std::time::{Duration, Instant};

use arquiz::app::{App, AppState};
use arquiz::bank::QuestionBank;
use arquiz::config::Config;
use arquiz::history::{JsonFileStore, SessionStore};
use arquiz::quiz::{Completion, QuizEngine, QuizPhase, FEEDBACK_DELAY};
use arquiz::render::SimulatedSurface;
use arquiz::runtime::{ChannelSource, QuizEvent, Runner};
use arquiz::session::{Language, QuizConfig};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::tempdir;

fn key(code: KeyCode) -> QuizEvent {
    QuizEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn send_answer(tx: &mpsc::Sender<QuizEvent>, answer: &str) {
    for c in answer.chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();
}

// Drives the app without a TTY through Runner and a channel source; every tick
// moves the clock by half a second.
#[test]
fn headless_quiz_all_correct_is_saved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    let mut app = App::new(
        QuestionBank::builtin().unwrap(),
        Box::new(JsonFileStore::new(&path)),
        None,
        Box::new(SimulatedSurface::new()),
        Config::default(),
    );

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(ChannelSource::from_receiver(rx), Duration::from_millis(1));

    let mut now = Instant::now();
    app.handle_event(key(KeyCode::Enter), now);
    assert_eq!(app.state, AppState::Quiz);

    let mut answered = None;
    for _ in 0..1000u32 {
        if app.state != AppState::Quiz {
            break;
        }
        let index = app.engine.current_index();
        if app.engine.phase() == QuizPhase::InProgress && answered != Some(index) {
            let expected = app.engine.expected_answer().unwrap().to_string();
            // case and surrounding whitespace are not significant
            send_answer(&tx, &format!("  {}  ", expected.to_uppercase()));
            answered = Some(index);
        }

        let event = runner.step();
        if matches!(event, QuizEvent::Tick) {
            now += Duration::from_millis(500);
        }
        app.handle_event(event, now);
    }

    assert_eq!(app.state, AppState::Results);
    let record = app.engine.record().unwrap().clone();
    assert_eq!(record.total_questions, 5);
    assert_eq!(record.correct_count, 5);
    assert_eq!(record.source_language, Language::En);
    assert_eq!(record.target_language, Language::Fr);

    let stored = JsonFileStore::new(&path);
    assert_eq!(stored.read_all(), vec![record]);
    let stats = stored.aggregate_stats();
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.best_score_percent, 100);
    assert_eq!(stats.average_score_percent, 100);
}

#[test]
fn engine_mixed_answers_french_source() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("sessions.json"));
    let bank = QuestionBank::builtin().unwrap();
    let mut engine = QuizEngine::new();
    let mut now = Instant::now();

    engine
        .start(QuizConfig::new(Language::Fr, Language::En, 5), &bank)
        .unwrap();

    for i in 0..5 {
        let answer = if i % 2 == 0 {
            engine.current_question().unwrap().english.clone()
        } else {
            "nope".to_string()
        };
        let feedback = engine.submit_answer(&answer, now).unwrap();
        assert_eq!(feedback.is_correct, i % 2 == 0);

        now += FEEDBACK_DELAY;
        engine.on_tick(now).unwrap();
    }

    assert_eq!(engine.phase(), QuizPhase::Finished);
    assert!(matches!(engine.finish(&store), Completion::Saved));
    assert!(matches!(engine.finish(&store), Completion::AlreadySaved));

    let log = store.read_all();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].correct_count, 3);
    assert_eq!(log[0].score_percent(), 60);
}

#[test]
fn oversized_request_is_capped_to_bank() {
    let bank = QuestionBank::builtin().unwrap();
    let mut engine = QuizEngine::new();
    engine
        .start(QuizConfig::new(Language::En, Language::Fr, 50), &bank)
        .unwrap();

    assert_eq!(engine.question_count(), bank.len());
    assert_eq!(engine.config().question_count, bank.len());

    let mut ids: Vec<_> = engine.questions().iter().map(|q| q.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), bank.len());
}
