use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{terminal, tty::IsTty};
use proctor::{
    app::{App, TICK_RATE_MS},
    app_dirs::AppDirs,
    config::{ConfigOverrides, ConfigStore, FileConfigStore},
    grader::GraderKind,
    host::{TerminalGuard, TerminalHost},
    logging::init_logging,
    questions::QuestionBank,
    runtime::{CrosstermEventSource, ExamEventSource, FixedTicker, Runner, Ticker},
    ui::ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info, warn};

/// proctored exam client for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Timed multiple-choice and coding tests in the terminal. The test runs full screen; losing focus or shrinking the window is recorded as a violation."
)]
pub struct Cli {
    /// route to open on start, e.g. "/test?type=mcq"
    #[clap(short = 'r', long, default_value = "/")]
    route: String,

    /// question bank (JSON) to use instead of the built-in one
    #[clap(short = 'q', long)]
    questions: Option<PathBuf>,

    /// test duration in seconds
    #[clap(short = 't', long)]
    time_limit: Option<u64>,

    /// violations tolerated before the test is terminated
    #[clap(long)]
    violation_limit: Option<u32>,

    /// smallest terminal width that counts as full screen
    #[clap(long)]
    min_cols: Option<u16>,

    /// smallest terminal height that counts as full screen
    #[clap(long)]
    min_rows: Option<u16>,

    /// how "run tests" judges a solution
    #[clap(long, value_enum)]
    grader: Option<GraderKind>,

    /// seed for the random grader
    #[clap(long)]
    grader_seed: Option<u64>,

    /// log filter, e.g. "debug" or "proctor=trace"; RUST_LOG takes precedence
    #[clap(long)]
    log_level: Option<String>,

    /// write the effective configuration back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn to_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            time_limit_secs: self.time_limit,
            violation_limit: self.violation_limit,
            min_cols: self.min_cols,
            min_rows: self.min_rows,
            grader: self.grader,
            grader_seed: self.grader_seed,
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let config = store.load().with_overrides(&cli.to_overrides());

    let log_path = AppDirs::log_path().unwrap_or_else(|| PathBuf::from("proctor.log"));
    if let Err(e) = init_logging(&config.log_level, &log_path) {
        // the terminal is not ours yet, so stderr is still readable
        eprintln!("proctor: logging disabled: {}", e);
    }
    info!(config = ?config, "starting");

    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "configuration saved");
    }

    let bank = match &cli.questions {
        Some(path) => QuestionBank::from_path(path),
        None => QuestionBank::builtin(),
    };
    let bank = match bank {
        Ok(bank) => bank,
        Err(e) => {
            error!(error = %e, "question bank rejected");
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, format!("questions: {}", e))
                .exit();
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut host = TerminalHost::new(config.min_cols, config.min_rows, terminal::size()?);
    let mut app = App::new(config, bank);

    let guard = TerminalGuard::acquire(io::stdout())?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    app.open_route(&cli.route, &mut host);
    let result = start_tui(&mut terminal, &mut app, &mut host, &runner);

    terminal.show_cursor()?;
    drop(guard);

    if let Err(e) = &result {
        error!(error = %e, "terminal loop failed");
    }
    info!("exiting");
    result
}

fn start_tui<B: Backend, E: ExamEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    host: &mut TerminalHost,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let mut last = Instant::now();

    loop {
        terminal.draw(|f| ui(app, f))?;

        let event = runner.step();

        let now = Instant::now();
        app.advance(now - last, host);
        last = now;

        app.handle_event(event, host);
        if app.should_quit {
            if app.session.as_ref().is_some_and(|s| s.is_active()) {
                warn!("quit with a test in progress");
            }
            app.close_session();
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["proctor"]);

        assert_eq!(cli.route, "/");
        assert_eq!(cli.questions, None);
        assert_eq!(cli.time_limit, None);
        assert_eq!(cli.grader, None);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_cli_route() {
        let cli = Cli::parse_from(["proctor", "-r", "/test?type=coding"]);
        assert_eq!(cli.route, "/test?type=coding");

        let cli = Cli::parse_from(["proctor", "--route", "/test?type=mcq"]);
        assert_eq!(cli.route, "/test?type=mcq");
    }

    #[test]
    fn test_cli_grader() {
        let cli = Cli::parse_from(["proctor", "--grader", "accept-all", "--grader-seed", "7"]);
        assert_eq!(cli.grader, Some(GraderKind::AcceptAll));
        assert_eq!(cli.grader_seed, Some(7));

        assert!(Cli::try_parse_from(["proctor", "--grader", "lenient"]).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "proctor",
            "-t",
            "600",
            "--violation-limit",
            "5",
            "--min-cols",
            "100",
            "--log-level",
            "debug",
        ]);
        let overrides = cli.to_overrides();

        assert_eq!(overrides.time_limit_secs, Some(600));
        assert_eq!(overrides.violation_limit, Some(5));
        assert_eq!(overrides.min_cols, Some(100));
        assert_eq!(overrides.min_rows, None);
        assert_eq!(overrides.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_questions_path() {
        let cli = Cli::parse_from(["proctor", "--questions", "bank.json"]);
        assert_eq!(cli.questions, Some(PathBuf::from("bank.json")));
    }
}
