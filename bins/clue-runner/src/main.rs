mod classifier;
mod config;
mod engine;
mod evaluator;
mod executor;
mod reporter;

#[cfg(test)]
mod engine_tests;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use classifier::ModeChoice;
use clue_common::config::Settings;
use clue_common::{archive, solution, HarnessError};
use config::InterpreterConfigManager;
use engine::LocalEngine;
use reporter::Reporter;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "clue-runner")]
#[command(
    about = "Run a solution against the latest tests archive and report each test",
    long_about = None
)]
struct Cli {
    /// Glob pattern of the tests archive (overrides TESTS_ZIP_PATTERN)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Solution file to test (overrides SOLUTION_PATH)
    #[arg(short, long)]
    solution: Option<PathBuf>,

    /// How stimuli reach the solution
    #[arg(short, long, value_enum, default_value_t = ModeChoice::Auto)]
    mode: ModeChoice,

    /// Interpreter command (defaults to `py` on Windows, `python3` elsewhere)
    #[arg(short, long, env = "CLUE_INTERPRETER")]
    interpreter: Option<String>,

    /// Interpreter config file, used when present
    #[arg(short, long, default_value = "config/interpreter.json")]
    config: PathBuf,

    /// Number of test cases to run at once
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    jobs: u16,

    /// Exit with status 1 when any test fails
    #[arg(long)]
    strict: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose logging on stderr (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// How a run ended, mapped onto the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Every test ran, whatever the verdicts
    Completed,
    /// Every test ran and `--strict` saw a failure
    StrictFailure,
    /// A fatal error stopped the run
    Aborted,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Completed => ExitCode::SUCCESS,
            Outcome::StrictFailure | Outcome::Aborted => ExitCode::FAILURE,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    load_dotenv(None);

    let width = reporter::terminal_width();
    execute(cli, |name| std::env::var(name).ok(), io::stdout(), width)
        .await
        .into()
}

/// Load a `.env` file into the process environment without overriding
/// variables that are already set. `None` searches the working directory
/// and its parents.
fn load_dotenv(path: Option<&Path>) {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
    }
}

/// Run the harness, writing the report (or the fatal error) to `out`
async fn execute<F, W>(cli: Cli, lookup: F, out: W, width: usize) -> Outcome
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let mut reporter = Reporter::new(out, width);

    match run(cli, lookup, &mut reporter).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(harness) = e.downcast_ref::<HarnessError>() {
                debug!(kind = ?harness.kind(), "Run aborted");
            }
            if let Err(write_err) = reporter.fatal(&e) {
                warn!(error = %write_err, "Failed to report fatal error");
            }
            Outcome::Aborted
        }
    }
}

async fn run<F, W>(cli: Cli, lookup: F, reporter: &mut Reporter<W>) -> Result<Outcome>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let settings = Settings::with_overrides(cli.pattern, cli.solution, lookup)?;

    let archive_path = archive::locate_latest(&settings.tests_zip_pattern)?;
    let tests = archive::load_test_set(&archive_path)?;
    let solution = solution::load_solution(&settings.solution_path)?;

    info!(
        archive = %archive_path.display(),
        solution = %settings.solution_path.display(),
        test_count = tests.len(),
        "Inputs loaded"
    );

    let sample = tests.first().ok_or(HarnessError::EmptyArchive)?;
    let mode = cli.mode.resolve(solution.as_str(), &sample.stimulus);
    if cli.mode == ModeChoice::Auto {
        info!(mode = %mode, "Classified execution mode from the first test");
    } else {
        info!(mode = %mode, "Execution mode forced from the command line");
    }

    let manager = InterpreterConfigManager::load_or_default(&cli.config)
        .context("Failed to load interpreter configuration")?
        .with_command(cli.interpreter);
    debug!(
        command = %manager.config().command,
        args = ?manager.config().args,
        "Interpreter resolved"
    );
    let engine = LocalEngine::new(manager.into_config());

    reporter.header(&archive_path, &settings.solution_path, mode, tests.len())?;

    let summary = executor::run_tests(
        &engine,
        &solution,
        &tests,
        mode,
        usize::from(cli.jobs),
        reporter,
    )
    .await?;

    if cli.strict && !summary.all_passed() {
        return Ok(Outcome::StrictFailure);
    }
    Ok(Outcome::Completed)
}
