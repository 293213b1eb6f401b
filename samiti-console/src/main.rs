//! samiti - command line console for the Samiti membership backend

mod cli;
mod commands;
mod logging;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use samiti_client::{ClientConfig, NetworkHttpClient, SamitiApi, SessionStore, Store};

use cli::Cli;

const DEFAULT_SESSION_FILE: &str = ".samiti/session.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let _log_guard = logging::init(&cli.log_dir, cli.verbose)?;

    let config = build_config(&cli);
    let session_file = config
        .session_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    let sessions = Arc::new(SessionStore::load(session_file));
    tracing::info!(api = %config.api_root(), authenticated = sessions.is_authenticated(), "Starting samiti console");

    let http = Arc::new(NetworkHttpClient::new(&config, sessions)?);
    let api = SamitiApi::new(http, Store::new());

    commands::run(cli, &api, &config).await
}

/// Environment first, then command line overrides
fn build_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        config.base_url = url.clone();
    }
    if let Some(path) = &cli.session_file {
        config.session_file = Some(path.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    config
}
