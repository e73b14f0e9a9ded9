mod app;
mod config;
mod error;
mod local_state;
mod ui;

use std::{fs, path::Path, sync::Mutex};

use crate::error::Result;

fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;

    tracing::info!("starting tally");
    let mut app = app::App::new(&config)?;
    let result = app.run();
    if let Err(err) = &result {
        tracing::error!("tally stopped: {err}");
    }
    result
}

/// Logs go to a file: the alternate screen owns stdout.
fn init_tracing(config: &config::AppConfig) -> Result<()> {
    if let Some(parent) = Path::new(&config.log_path).parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tally_tui={level},engine={level}",
            level = config.level
        ))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
