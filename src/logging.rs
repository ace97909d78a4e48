//! File logging
//!
//! The terminal is owned by the UI, so diagnostics go to
//! `<data dir>/pokedex/pokedex.log`. The filter comes from `POKEDEX_LOG`,
//! then `RUST_LOG`, then [`DEFAULT_FILTER`].

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "POKEDEX_LOG";
pub const LOG_FILE: &str = "pokedex.log";
pub const DEFAULT_FILTER: &str = "pokedex=info";

pub fn log_dir() -> PathBuf {
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pokedex")
}

fn filter_directives() -> String {
    std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber and return the log file path.
pub fn initialize_logging() -> io::Result<PathBuf> {
    let directory = log_dir();
    fs::create_dir_all(&directory)?;
    let log_path = directory.join(LOG_FILE);
    let log_file = File::create(&log_path)?;

    let filter = EnvFilter::try_new(filter_directives())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;
    Ok(log_path)
}
