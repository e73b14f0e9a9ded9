use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tally.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub snapshot_path: String,
    pub log_path: String,
    pub level: String,
    /// Start in currency mode (`true`) or plain mode (`false`) regardless of
    /// what the snapshot says.
    pub currency_mode: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "config/tally_state.json".to_string(),
            log_path: "config/tally.log".to_string(),
            level: "info".to_string(),
            currency_mode: None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tally", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the snapshot file.
    #[arg(long)]
    snapshot_path: Option<String>,
    /// Override the log file.
    #[arg(long)]
    log_path: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,
    /// Force currency mode on or off at start-up.
    #[arg(long)]
    currency: Option<bool>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TALLY"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(snapshot_path) = args.snapshot_path {
        settings.snapshot_path = snapshot_path;
    }
    if let Some(log_path) = args.log_path {
        settings.log_path = log_path;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }
    if args.currency.is_some() {
        settings.currency_mode = args.currency;
    }

    Ok(settings)
}
