mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keydrill::{
    app_dirs::AppDirs,
    best::{BestScoreStore, BestScores, FileBestScoreStore},
    config::{Config, ConfigStore, FileConfigStore},
    dataset::{self, Dataset, PositionGroup},
    i18n::Lang,
    logging,
    runtime::{CrosstermEventSource, DrillEvent, DrillEventSource, FixedTicker, Runner, Ticker},
    session::PracticeSession,
    task::{LevelFilter, Mode},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Instant,
};
use tracing::{info, warn};

/// keyboard position drills and sentence typing practice in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing trainer with two modes: position drills over a group of keys, and sentence practice filtered by difficulty. Typing only moves forward; mistakes stay on screen and count against accuracy."
)]
pub struct Cli {
    /// practice mode to start in
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// key group for position drills
    #[clap(short = 'g', long, value_enum)]
    group: Option<PositionGroup>,

    /// sentence difficulty filter
    #[clap(short = 'd', long, value_enum)]
    level: Option<LevelFilter>,

    /// interface language
    #[clap(short = 'l', long, value_enum)]
    lang: Option<Lang>,

    /// http(s) url of a JSON document replacing the built-in practice data
    #[clap(long)]
    data_url: Option<String>,

    /// custom text to practice instead of generated tasks
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// print the best records and exit
    #[clap(long)]
    best: bool,

    /// clear the best records and exit
    #[clap(long)]
    reset_best: bool,
}

impl Cli {
    /// Flags win over the remembered preferences
    fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(group) = self.group {
            config.group = group;
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(lang) = self.lang {
            config.language = lang;
        }
        if self.data_url.is_some() {
            config.data_url = self.data_url.clone();
        }
        config
    }
}

#[derive(Debug)]
pub struct App {
    pub session: PracticeSession,
    pub lang: Lang,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: PracticeSession, lang: Lang) -> Self {
        Self {
            session,
            lang,
            should_quit: false,
        }
    }

    /// Position the session the way the config (and an optional prompt) asks
    pub fn from_config(mut session: PracticeSession, config: &Config, prompt: Option<String>) -> Self {
        session.select_level(config.level);
        match config.mode {
            Mode::Position => session.load_position(config.group),
            Mode::Sentence => {
                session.load_position(config.group);
                session.load_sentence();
            }
        }
        if let Some(text) = prompt.filter(|t| !t.trim().is_empty()) {
            session.load_custom(text);
        }
        Self::new(session, config.language)
    }

    /// Preferences to remember for the next run
    pub fn config(&self, data_url: Option<String>) -> Config {
        Config {
            language: self.lang,
            mode: self.session.mode(),
            group: self.session.group(),
            level: self.session.level(),
            data_url,
        }
    }

    pub fn on_event(&mut self, event: DrillEvent, now: Instant) {
        match event {
            DrillEvent::Key(key) => self.on_key(key, now),
            DrillEvent::Tick => self.session.tick(now),
            DrillEvent::Resize => {}
            DrillEvent::DataLoaded(data) => {
                info!("practice data replaced");
                self.session.replace_dataset(*data);
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('n') if ctrl => self.session.next_task(),
            KeyCode::Char('r') if ctrl => self.session.restart(),
            KeyCode::Char('l') if ctrl => self.lang = self.lang.toggled(),
            KeyCode::Tab => {
                let mode = self.session.mode().toggled();
                self.session.switch_mode(mode);
            }
            KeyCode::F(n) => {
                if let Some(group) = (n as usize)
                    .checked_sub(1)
                    .and_then(PositionGroup::from_index)
                {
                    self.session.load_position(group);
                }
            }
            KeyCode::PageDown => self.cycle(true),
            KeyCode::PageUp => self.cycle(false),
            _ => {
                self.session.handle_key(&key, now);
            }
        }
    }

    /// Groups in position mode, difficulty levels in sentence mode
    fn cycle(&mut self, forward: bool) {
        match self.session.mode() {
            Mode::Position => {
                let group = self.session.group();
                let group = if forward { group.next() } else { group.prev() };
                self.session.load_position(group);
            }
            Mode::Sentence => {
                let level = self.session.level();
                let level = if forward { level.next() } else { level.prev() };
                self.session.set_level(level);
            }
        }
    }
}

fn print_best(store: &dyn BestScoreStore) {
    let scores = store.load();
    for mode in [Mode::Position, Mode::Sentence] {
        let record = scores.get(mode);
        let updated = record
            .updated_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} wpm {:>4}  acc {:>3}%  {}",
            mode.to_string(),
            record.wpm,
            record.accuracy,
            updated
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // logging is best effort; an unwritable state dir must not stop the drill
    let _log_guard = logging::init_logging(&AppDirs::log_dir()).ok();

    let best_store = FileBestScoreStore::new();
    if cli.best {
        print_best(&best_store);
        return Ok(());
    }
    if cli.reset_best {
        best_store.save(&BestScores::default())?;
        println!("best records cleared: {}", best_store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let config = cli.apply(config_store.load());
    info!(?config, "starting");

    let session = PracticeSession::new(Dataset::builtin(), Box::new(best_store));
    let mut app = App::from_config(session, &config, cli.prompt.clone());

    let events = CrosstermEventSource::new();
    if let Some(url) = config.data_url.clone() {
        let tx = events.sender();
        dataset::spawn_fetch(url, move |data| {
            let _ = tx.send(DrillEvent::DataLoaded(Box::new(data)));
        });
    }
    let runner = Runner::new(events, FixedTicker::default());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = config_store.save(&app.config(config.data_url)) {
        warn!(error = %err, "could not save config");
    }

    res
}

fn start_tui<B: Backend, E: DrillEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(app, f))?;

        let event = runner.step();
        app.on_event(event, Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use keydrill::best::MemoryBestScoreStore;
    use rand::{rngs::StdRng, SeedableRng};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn session() -> PracticeSession {
        PracticeSession::with_rng(
            Dataset::builtin(),
            Box::new(MemoryBestScoreStore::new()),
            StdRng::seed_from_u64(3),
        )
    }

    fn app() -> App {
        App::new(session(), Lang::En)
    }

    #[test]
    fn test_cli_defaults_leave_config_alone() {
        let cli = Cli::parse_from(["keydrill"]);

        assert_eq!(cli.mode, None);
        assert_eq!(cli.prompt, None);
        assert!(!cli.best);
        assert!(!cli.reset_best);
        assert_eq!(cli.apply(Config::default()), Config::default());
    }

    #[test]
    fn test_cli_value_enums() {
        let cli = Cli::parse_from([
            "keydrill", "-m", "sentence", "-g", "left-top", "-d", "hard", "-l", "en",
        ]);

        assert_eq!(cli.mode, Some(Mode::Sentence));
        assert_eq!(cli.group, Some(PositionGroup::LeftTop));
        assert_eq!(cli.level, Some(LevelFilter::Hard));
        assert_eq!(cli.lang, Some(Lang::En));
    }

    #[test]
    fn test_cli_rejects_unknown_group() {
        assert!(Cli::try_parse_from(["keydrill", "--group", "thumbs"]).is_err());
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "keydrill",
            "--lang",
            "en",
            "--data-url",
            "https://example.com/typing.json",
        ]);
        let stored = Config {
            group: PositionGroup::Number,
            ..Config::default()
        };

        let merged = cli.apply(stored);

        assert_eq!(merged.language, Lang::En);
        assert_eq!(merged.group, PositionGroup::Number);
        assert_eq!(
            merged.data_url.as_deref(),
            Some("https://example.com/typing.json")
        );
    }

    #[test]
    fn test_from_config_restores_sentence_mode() {
        let config = Config {
            mode: Mode::Sentence,
            level: LevelFilter::Easy,
            group: PositionGroup::Center,
            ..Config::default()
        };

        let app = App::from_config(session(), &config, None);

        assert_eq!(app.session.mode(), Mode::Sentence);
        assert_eq!(app.session.level(), LevelFilter::Easy);
        assert_eq!(app.session.group(), PositionGroup::Center);
        assert_eq!(app.config(None), config);
    }

    #[test]
    fn test_from_config_with_prompt() {
        let app = App::from_config(session(), &Config::default(), Some("hi there".into()));

        assert!(app.session.is_custom());
        assert_eq!(app.session.task().text, "hi there");
    }

    #[test]
    fn test_position_start_keeps_stored_level() {
        let config = Config {
            mode: Mode::Position,
            level: LevelFilter::Medium,
            group: PositionGroup::RightBottom,
            ..Config::default()
        };

        let app = App::from_config(session(), &config, None);

        assert_eq!(app.session.mode(), Mode::Position);
        assert_eq!(app.session.level(), LevelFilter::Medium);
        assert_eq!(app.config(None), config);
    }

    #[test]
    fn test_prompt_run_keeps_stored_preferences() {
        for mode in [Mode::Position, Mode::Sentence] {
            let config = Config {
                mode,
                level: LevelFilter::Hard,
                group: PositionGroup::Number,
                ..Config::default()
            };

            let app = App::from_config(session(), &config, Some("hi".into()));

            assert!(app.session.is_custom());
            assert_eq!(app.config(None), config);
        }
    }

    #[test]
    fn test_blank_prompt_is_ignored() {
        let app = App::from_config(session(), &Config::default(), Some("   ".into()));

        assert!(!app.session.is_custom());
    }

    #[test]
    fn test_quit_keys() {
        let mut a = app();
        a.on_key(key(KeyCode::Esc), Instant::now());
        assert!(a.should_quit);

        let mut a = app();
        a.on_key(ctrl('c'), Instant::now());
        assert!(a.should_quit);
    }

    #[test]
    fn test_tab_switches_mode() {
        let mut a = app();
        a.on_key(key(KeyCode::Tab), Instant::now());
        assert_eq!(a.session.mode(), Mode::Sentence);

        a.on_key(key(KeyCode::Tab), Instant::now());
        assert_eq!(a.session.mode(), Mode::Position);
    }

    #[test]
    fn test_function_keys_pick_groups() {
        let mut a = app();
        a.on_key(key(KeyCode::F(8)), Instant::now());
        assert_eq!(a.session.group(), PositionGroup::Number);

        a.on_key(key(KeyCode::F(2)), Instant::now());
        assert_eq!(a.session.group(), PositionGroup::LeftTop);

        // past the last group
        a.on_key(key(KeyCode::F(9)), Instant::now());
        assert_eq!(a.session.group(), PositionGroup::LeftTop);
    }

    #[test]
    fn test_page_keys_cycle_groups_then_levels() {
        let mut a = app();
        a.on_key(key(KeyCode::PageUp), Instant::now());
        assert_eq!(a.session.group(), PositionGroup::Number);

        a.on_key(key(KeyCode::Tab), Instant::now());
        a.on_key(key(KeyCode::PageDown), Instant::now());
        assert_eq!(a.session.level(), LevelFilter::Easy);
        assert_eq!(a.session.group(), PositionGroup::Number);
    }

    #[test]
    fn test_ctrl_l_toggles_language() {
        let mut a = app();
        a.on_key(ctrl('l'), Instant::now());
        assert_eq!(a.lang, Lang::Ko);
    }

    #[test]
    fn test_typing_goes_to_session() {
        let mut a = app();
        let first = a.session.task().text.chars().next().unwrap();

        a.on_key(key(KeyCode::Char(first)), Instant::now());
        a.on_key(key(KeyCode::Backspace), Instant::now());

        assert_eq!(a.session.input().typed, first.to_string());
        assert_eq!(a.session.input().correct, 1);
    }

    #[test]
    fn test_ctrl_r_restarts_on_home_row() {
        let mut a = app();
        a.on_key(key(KeyCode::F(5)), Instant::now());
        a.on_key(ctrl('r'), Instant::now());
        assert_eq!(a.session.group(), PositionGroup::Home);
        assert_eq!(a.session.input().typed, "");
    }

    #[test]
    fn test_data_loaded_keeps_current_task() {
        let mut a = app();
        let before = a.session.task().clone();
        let replacement = Dataset::from_json(
            r#"{ "positions": { "home": ["q"] }, "sentences": ["Only one."] }"#,
        )
        .unwrap();

        a.on_event(DrillEvent::DataLoaded(Box::new(replacement)), Instant::now());

        assert_eq!(a.session.task(), &before);
        a.on_key(key(KeyCode::F(1)), Instant::now());
        assert!(a.session.task().text.chars().all(|c| c == 'q' || c == ' '));
    }

    #[test]
    fn test_ui_renders_into_test_backend() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut a = app();
        a.session.load_custom("hello".into());

        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&a, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("hello"));
        assert!(content.contains("WPM"));
    }
}
