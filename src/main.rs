use arquiz::{
    app::{App, AppState},
    app_dirs::AppDirs,
    bank::QuestionBank,
    config::{Config, ConfigStore, FileConfigStore},
    history::{JsonFileStore, MemorySessionStore, SessionStore},
    render::select_surface,
    runtime::{ChannelSource, Runner, TICK_RATE},
    session::Language,
    ui,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Instant,
};
use tracing::{info, warn};

/// vocabulary translation quiz with a simulated AR object view
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Translate everyday words between English and French. Each question shows the object, answers are checked on the spot and every finished quiz is kept in a local score history."
)]
pub struct Cli {
    /// language the words are shown in
    #[clap(short = 's', long = "source", value_enum)]
    source_language: Option<Language>,

    /// language to answer in
    #[clap(short = 't', long = "target", value_enum)]
    target_language: Option<Language>,

    /// number of questions per quiz
    #[clap(short = 'n', long = "questions", value_parser = parse_question_count)]
    question_count: Option<usize>,

    /// open on the history screen
    #[clap(long)]
    history: bool,

    /// delete the session history and exit
    #[clap(long)]
    clear_history: bool,

    /// print aggregate statistics and exit
    #[clap(long)]
    stats: bool,

    /// keep config, history and log in this directory
    #[clap(long)]
    data_dir: Option<PathBuf>,
}

fn parse_question_count(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("a quiz needs at least one question".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    fn dirs(&self) -> Option<AppDirs> {
        match &self.data_dir {
            Some(dir) => Some(AppDirs::with_root(dir)),
            None => AppDirs::resolve(),
        }
    }

    /// Stored preferences with the command-line overrides applied.
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(source) = self.source_language {
            cfg.source_language = source;
        }
        if let Some(target) = self.target_language {
            cfg.target_language = target;
        }
        if let Some(count) = self.question_count {
            cfg.question_count = count;
        }
        cfg
    }
}

fn init_logging(dirs: &AppDirs) {
    if fs::create_dir_all(dirs.state_dir()).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dirs.log_path())
    else {
        return;
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("arquiz=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn open_store(dirs: Option<&AppDirs>) -> Box<dyn SessionStore> {
    match dirs {
        Some(dirs) => Box::new(JsonFileStore::new(dirs.history_path())),
        None => Box::new(MemorySessionStore::new()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let dirs = cli.dirs();
    if let Some(dirs) = &dirs {
        init_logging(dirs);
    }
    let store = open_store(dirs.as_ref());

    if cli.clear_history {
        store.clear()?;
        println!("Historique effacé");
        return Ok(());
    }

    if cli.stats {
        let stats = store.aggregate_stats();
        println!("Quiz terminés : {}", stats.total_sessions);
        println!("Questions : {}", stats.total_questions);
        println!("Bonnes réponses : {}", stats.total_correct);
        println!("Score moyen : {}%", stats.average_score_percent);
        println!("Meilleur score : {}%", stats.best_score_percent);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store: Option<Box<dyn ConfigStore>> = dirs
        .as_ref()
        .map(|d| Box::new(FileConfigStore::with_path(d.config_path())) as Box<dyn ConfigStore>);
    let config = cli.apply(config_store.as_ref().map(|s| s.load()).unwrap_or_default());

    let bank = QuestionBank::builtin()?;
    let mut app = App::new(bank, store, config_store, select_surface(None), config);
    if cli.history {
        app.open_history();
    }
    info!(kind = %app.surface.kind(), "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    app.leave_quiz();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(error = %e, "terminal loop failed");
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(ChannelSource::terminal(), TICK_RATE);

    let size = terminal.size()?;
    app.resize(size.width, size.height);

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        app.handle_event(runner.step(), Instant::now());

        if app.should_quit {
            break;
        }
    }

    if app.state == AppState::Quiz {
        info!("quit during a quiz, nothing saved");
    }
    Ok(())
}
