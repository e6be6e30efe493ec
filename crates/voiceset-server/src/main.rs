//! Voiceset Server - Main entry point

use anyhow::Result;
use tracing::info;
use voiceset_common::logging::{init_logging, LogConfig};

use voiceset_server::{api, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with configuration from environment
    let log_config = LogConfig::builder()
        .log_file_prefix("voiceset-server".to_string())
        .filter_directives("voiceset_server=debug,tower_http=debug,sqlx=info".to_string())
        .build();

    // Environment variables take precedence over the built-in defaults
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    info!("Starting Voiceset Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    api::serve(config).await
}
