mod app;
mod buffer;
mod error;
mod event;
mod input;
mod paths;
mod raster;
mod settings;
mod terminal;
mod theme;

use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use gitscape_diagram::{RepoRef, build_with_report};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::App;
use crate::error::AppError;
use crate::settings::Settings;
use crate::terminal::Terminal;

/// Explore a repository tree as an interactive diagram.
#[derive(Debug, Parser)]
#[command(name = "gitscape", version, about)]
struct Cli {
    /// JSON tree listing to draw, or `-` for standard input.
    entries: PathBuf,

    /// Repository display name, as `owner/name`.
    #[arg(short, long)]
    repo: String,

    /// Branch that file links point at.
    #[arg(short, long, default_value = "main")]
    branch: String,

    /// Settings file to use instead of the one in the config directory.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Apply every change at once instead of animating it.
    #[arg(long)]
    reduced_motion: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to `latest.log` in the cache directory, archiving the previous run.
fn init_logging() -> Result<(), AppError> {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|error| AppError::Log {
            path: path.clone(),
            error,
        })?;
    }
    let file = File::create(&path).map_err(|error| AppError::Log {
        path: path.clone(),
        error,
    })?;
    // A logger that is already set keeps working
    let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.reduced_motion {
        settings.diagram.reduced_motion = true;
    }

    // Read everything before the terminal takes over standard input
    let entries = input::read_entries(&cli.entries)?;
    let (root, issues) = build_with_report(&entries, &cli.repo);
    for issue in &issues {
        log::warn!("{issue}");
    }

    let repo = RepoRef::new(cli.repo, cli.branch);
    let mut terminal = Terminal::new()?;
    let mut app = App::new(settings, root, repo, terminal.size(), Instant::now());
    log::info!(
        "diagram for {} opened, initialized: {}",
        app.renderer()
            .repo()
            .map(|repo| repo.display_name.as_str())
            .unwrap_or_default(),
        app.renderer().is_initialized()
    );

    app::run(&mut terminal, &mut app)
}
