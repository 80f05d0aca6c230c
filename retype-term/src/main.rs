//! Retype any file in your terminal, character by character.
use std::path::{Path, PathBuf};

use clap::Parser;
use derive_more::From;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod document;
mod utils;

use app::App;
use config::Settings;
use document::Document;

const LOG_FILE: &str = "retype.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "retype-term", version, about)]
struct Args {
    /// File to practice on
    file: PathBuf,

    /// Start practicing right away, from this character offset
    #[arg(long)]
    offset: Option<usize>,

    /// Directory containing `settings.toml`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write logs. Filtered through `RUST_LOG`.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, From, Error)]
enum AppError {
    #[error("{0}")]
    Config(config::ConfigError),

    #[error("Failed to read '{path}': {error}")]
    #[from(skip)]
    ReadFile {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Terminal error: {0}")]
    Terminal(std::io::Error),
}

/// Install a file logger, since the terminal belongs to the app
fn configure_logging(log_file: Option<PathBuf>) -> Option<WorkerGuard> {
    let log_file = log_file.or_else(|| config::default_directory().map(|dir| dir.join(LOG_FILE)))?;
    let directory = log_file.parent()?.to_path_buf();
    let file_name = log_file.file_name()?.to_os_string();

    std::fs::create_dir_all(&directory).ok()?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|()| guard)
}

fn load_document(path: &Path, settings: &Settings) -> Result<Document, AppError> {
    let text = std::fs::read_to_string(path).map_err(|error| AppError::ReadFile {
        path: path.to_path_buf(),
        error,
    })?;
    let text = text.replace("\r\n", "\n");

    tracing::debug!(
        target: "retype.term",
        file = %path.display(),
        characters = text.chars().count(),
        "file_read_ok"
    );

    Ok(Document::new(&text, settings.editor_settings()))
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let _log_guard = configure_logging(args.log_file.clone());

    tracing::info!(target: "retype.term", "startup");

    let settings = Settings::get(args.config.clone())?;
    let document = load_document(&args.file, &settings)?;

    let mut app = App::new(document, settings);
    if let Some(offset) = args.offset {
        app.start_at(offset);
    }

    app.run()?;

    Ok(())
}
