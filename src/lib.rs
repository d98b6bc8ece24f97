pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use anyhow::Result;
use providers::HttpCurrencySource;
use tracing::{debug, info};

/// Commands that need a loaded configuration and a currency source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    List,
    Convert { left: String, right: String },
    Watch,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ratecast starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let source = HttpCurrencySource::new(&config.server_url)?;
    let base = config.base_currency.clone();

    match command {
        AppCommand::List => cli::list::run(&source, base).await,
        AppCommand::Convert { left, right } => {
            cli::convert::run(&source, base, &left, &right).await
        }
        AppCommand::Watch => cli::watch::run(&source, base, config.refresh_interval()).await,
    }
}
