use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::bank::QuestionBank;
use crate::config::{Config, ConfigStore};
use crate::history::{HistoryStats, SessionStore};
use crate::quiz::{Advance, Completion, QuizEngine, QuizPhase};
use crate::render::{RenderSurface, RenderTarget};
use crate::runtime::QuizEvent;
use crate::session::{QuizConfig, SessionRecord, QUESTION_COUNT_CHOICES};

/// Longest answer accepted by the input line.
const MAX_INPUT_CHARS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Home,
    Quiz,
    Results,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeField {
    Source,
    Target,
    Count,
}

impl HomeField {
    fn next(self) -> Self {
        match self {
            HomeField::Source => HomeField::Target,
            HomeField::Target => HomeField::Count,
            HomeField::Count => HomeField::Source,
        }
    }

    fn prev(self) -> Self {
        match self {
            HomeField::Source => HomeField::Count,
            HomeField::Target => HomeField::Source,
            HomeField::Count => HomeField::Target,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HomeState {
    pub config: Config,
    pub focus: HomeField,
}

impl HomeState {
    fn cycle_focused(&mut self) {
        match self.focus {
            HomeField::Source => self.config.source_language = self.config.source_language.other(),
            HomeField::Target => self.config.target_language = self.config.target_language.other(),
            HomeField::Count => {
                let idx = QUESTION_COUNT_CHOICES
                    .iter()
                    .position(|&c| c == self.config.question_count)
                    .map_or(0, |i| (i + 1) % QUESTION_COUNT_CHOICES.len());
                self.config.question_count = QUESTION_COUNT_CHOICES[idx];
            }
        }
    }
}

/// Terminal presentation shell around the quiz engine.
pub struct App {
    pub state: AppState,
    pub home: HomeState,
    pub engine: QuizEngine,
    pub input: String,
    pub surface: Box<dyn RenderSurface>,
    pub history: Vec<SessionRecord>,
    pub stats: HistoryStats,
    pub history_scroll: usize,
    /// One-line notice shown in the footer (e.g. a failed save).
    pub status: Option<String>,
    pub should_quit: bool,
    bank: QuestionBank,
    store: Box<dyn SessionStore>,
    config_store: Option<Box<dyn ConfigStore>>,
    surface_area: (u16, u16),
}

impl App {
    pub fn new(
        bank: QuestionBank,
        store: Box<dyn SessionStore>,
        config_store: Option<Box<dyn ConfigStore>>,
        surface: Box<dyn RenderSurface>,
        config: Config,
    ) -> Self {
        Self {
            state: AppState::Home,
            home: HomeState {
                config,
                focus: HomeField::Source,
            },
            engine: QuizEngine::new(),
            input: String::new(),
            surface,
            history: Vec::new(),
            stats: HistoryStats::default(),
            history_scroll: 0,
            status: None,
            should_quit: false,
            bank,
            store,
            config_store,
            surface_area: (40, 10),
        }
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        // the object view takes roughly the upper half of the quiz screen
        self.surface_area = (width.saturating_sub(4), (height / 2).max(6));
    }

    pub fn handle_event(&mut self, event: QuizEvent, now: Instant) {
        match event {
            QuizEvent::Key(key) => self.on_key(key, now),
            QuizEvent::Resize { width, height } => self.resize(width, height),
            QuizEvent::Tick => self.on_tick(now),
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.state == AppState::Quiz {
            match self.engine.on_tick(now) {
                Some(Advance::NextQuestion(_)) => {
                    self.input.clear();
                    self.show_current_question(now);
                }
                Some(Advance::Finished(_)) => self.complete_quiz(now),
                None => {}
            }
        }
        self.surface.on_tick(now);
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.leave_quiz();
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Home => self.on_home_key(key, now),
            AppState::Quiz => self.on_quiz_key(key, now),
            AppState::Results => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => self.start_quiz(now),
                KeyCode::Char('h') => self.open_history(),
                KeyCode::Char('n') | KeyCode::Esc => self.state = AppState::Home,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            AppState::History => match key.code {
                KeyCode::Up => self.history_scroll = self.history_scroll.saturating_sub(1),
                KeyCode::Down => {
                    if self.history_scroll + 1 < self.history.len() {
                        self.history_scroll += 1;
                    }
                }
                KeyCode::Home => self.history_scroll = 0,
                KeyCode::Char('c') => self.clear_history(),
                KeyCode::Esc | KeyCode::Char('b') => self.state = AppState::Home,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
        }
    }

    fn on_home_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.home.focus = self.home.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.home.focus = self.home.focus.prev(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => self.home.cycle_focused(),
            KeyCode::Enter => self.start_quiz(now),
            KeyCode::Char('h') => self.open_history(),
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_quiz_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.leave_quiz();
                self.state = AppState::Home;
            }
            KeyCode::Enter => self.submit(now),
            KeyCode::Backspace => {
                if self.engine.phase() == QuizPhase::InProgress {
                    self.input.pop();
                }
            }
            KeyCode::Char(c) => {
                if self.engine.phase() == QuizPhase::InProgress
                    && self.input.chars().count() < MAX_INPUT_CHARS
                {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    /// Start a quiz with the home screen selection.
    pub fn start_quiz(&mut self, now: Instant) {
        self.status = None;
        let config = QuizConfig::from(&self.home.config);
        if let Err(e) = self.engine.start(config, &self.bank) {
            self.status = Some(e.to_string());
            return;
        }

        if let Some(store) = &self.config_store {
            if let Err(e) = store.save(&self.home.config) {
                warn!(error = %e, "unable to save preferences");
            }
        }

        self.input.clear();
        self.show_current_question(now);
        self.state = AppState::Quiz;
    }

    fn submit(&mut self, now: Instant) {
        let Some(feedback) = self.engine.submit_answer(&self.input, now) else {
            return;
        };
        if feedback.is_correct {
            self.surface.set_success(true, self.surface_area, now);
        }
    }

    fn show_current_question(&mut self, now: Instant) {
        self.surface.set_success(false, self.surface_area, now);
        if let Some(question) = self.engine.current_question() {
            let target = RenderTarget::from(question);
            self.surface.show(&target, now);
        }
    }

    fn complete_quiz(&mut self, now: Instant) {
        self.input.clear();
        self.surface.set_success(false, self.surface_area, now);

        if let Completion::SaveFailed(e) = self.engine.finish(self.store.as_ref()) {
            self.status = Some(format!("Historique non sauvegardé : {e}"));
        }
        self.state = AppState::Results;
    }

    /// Cancel anything the quiz screen scheduled.
    pub fn leave_quiz(&mut self) {
        self.engine.teardown();
        self.surface.set_success(false, self.surface_area, Instant::now());
        self.input.clear();
    }

    pub fn open_history(&mut self) {
        self.reload_history();
        self.history_scroll = 0;
        self.state = AppState::History;
    }

    fn reload_history(&mut self) {
        self.history = self.store.read_all();
        self.stats = HistoryStats::from_records(&self.history);
    }

    fn clear_history(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "unable to clear history");
            self.status = Some(format!("Impossible d'effacer l'historique : {e}"));
        }
        self.reload_history();
        self.history_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemorySessionStore;
    use crate::render::SimulatedSurface;
    use crate::session::Language;
    use std::time::Duration;

    fn app() -> App {
        App::new(
            QuestionBank::builtin().unwrap(),
            Box::new(MemorySessionStore::new()),
            None,
            Box::new(SimulatedSurface::new()),
            Config::default(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.on_key(key(KeyCode::Char(c)), now);
        }
    }

    #[test]
    fn home_cycles_selection() {
        let mut app = app();
        app.on_key(key(KeyCode::Right), Instant::now());
        assert_eq!(app.home.config.source_language, Language::Fr);

        app.on_key(key(KeyCode::Tab), Instant::now());
        app.on_key(key(KeyCode::Tab), Instant::now());
        assert_eq!(app.home.focus, HomeField::Count);
        app.on_key(key(KeyCode::Char(' ')), Instant::now());
        assert_eq!(app.home.config.question_count, 10);
        app.on_key(key(KeyCode::Char(' ')), Instant::now());
        assert_eq!(app.home.config.question_count, 5);
    }

    #[test]
    fn enter_on_blank_input_does_nothing() {
        let mut app = app();
        let now = Instant::now();
        app.on_key(key(KeyCode::Enter), now);
        assert_eq!(app.state, AppState::Quiz);

        type_text(&mut app, "   ", now);
        app.on_key(key(KeyCode::Enter), now);
        assert_eq!(app.engine.phase(), QuizPhase::InProgress);
        assert!(app.engine.pending_feedback().is_none());
    }

    #[test]
    fn input_is_frozen_while_feedback_shows() {
        let mut app = app();
        let now = Instant::now();
        app.start_quiz(now);

        type_text(&mut app, "zzz", now);
        app.on_key(key(KeyCode::Enter), now);
        type_text(&mut app, "abc", now);
        app.on_key(key(KeyCode::Backspace), now);
        assert_eq!(app.input, "zzz");

        app.on_tick(now + Duration::from_secs(2));
        assert!(app.input.is_empty());
        assert_eq!(app.engine.current_index(), 1);
    }

    #[test]
    fn full_quiz_reaches_results_and_history() {
        let mut app = app();
        let mut now = Instant::now();
        app.start_quiz(now);

        while app.state == AppState::Quiz {
            let expected = app.engine.expected_answer().unwrap().to_string();
            type_text(&mut app, &expected, now);
            app.on_key(key(KeyCode::Enter), now);
            now += Duration::from_secs(2);
            app.on_tick(now);
        }

        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.engine.record().unwrap().correct_count, 5);
        assert!(app.status.is_none());

        app.on_key(key(KeyCode::Char('h')), now);
        assert_eq!(app.state, AppState::History);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.stats.best_score_percent, 100);

        app.on_key(key(KeyCode::Char('c')), now);
        assert!(app.history.is_empty());
        assert_eq!(app.stats, HistoryStats::default());
    }

    #[test]
    fn escape_mid_quiz_cancels_pending_advance() {
        let mut app = app();
        let now = Instant::now();
        app.start_quiz(now);
        type_text(&mut app, "zzz", now);
        app.on_key(key(KeyCode::Enter), now);

        app.on_key(key(KeyCode::Esc), now);
        assert_eq!(app.state, AppState::Home);
        assert!(!app.engine.is_advance_pending());

        app.on_tick(now + Duration::from_secs(5));
        assert_eq!(app.engine.current_index(), 0);
        assert!(app.store().read_all().is_empty());
    }

    #[test]
    fn resize_event_sizes_the_celebration_area() {
        let mut app = app();
        app.handle_event(QuizEvent::Resize { width: 100, height: 40 }, Instant::now());
        assert_eq!(app.surface_area, (96, 20));

        app.handle_event(QuizEvent::Resize { width: 2, height: 4 }, Instant::now());
        assert_eq!(app.surface_area, (0, 6));
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = app();
        app.start_quiz(Instant::now());
        app.on_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert!(app.should_quit);
        assert!(app.input.is_empty());
    }
}
