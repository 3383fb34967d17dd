//! Tracing subscriber setup.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};


/// Where log lines go.
pub enum LogTarget<'a> {
    /// Standard error, for one-shot commands.
    Stderr,
    /// Append to a file, for the full-screen dashboard which owns the terminal.
    File(&'a Path),
}


/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(target: LogTarget<'_>, verbose: bool) -> Result<()> {
    let default_filter = if verbose { "fraudboard=debug" } else { "fraudboard=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);

    match target {
        LogTarget::Stderr => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogTarget::File(path) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(open_log_file(path)?)),
            )
            .try_init(),
    }
    .context("Failed to initialize logging")
}


fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
