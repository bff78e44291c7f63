//! HTTP action server for MindMate chat front ends.
//!
//! Usage: `mindmate-server [CONFIG_PATH]`
//!
//! Without an argument the default config path is used if it exists;
//! otherwise built-in defaults apply. Logs go to stderr (and to the
//! configured log directory, if any).

use mindmate::config::MindMateConfig;
use mindmate::server::{AppState, MindMateServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    let _log_guard = mindmate::logging::init(&config.logging)
        .map_err(|e| anyhow::anyhow!("logging setup failed: {e}"))?;

    tracing::info!("mindmate-server starting");

    let state = AppState::from_config(&config).map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        anyhow::anyhow!("mindmate-server failed to start: {e}")
    })?;
    let server = MindMateServer::start(state, &config.server)
        .await
        .map_err(|e| anyhow::anyhow!("mindmate-server failed to start: {e}"))?;

    tracing::info!(port = server.port(), "mindmate-server ready");

    tokio::signal::ctrl_c().await?;
    server.shutdown();

    tracing::info!("mindmate-server shut down cleanly");
    Ok(())
}

fn load_config() -> anyhow::Result<MindMateConfig> {
    let explicit = std::env::args().nth(1).map(std::path::PathBuf::from);
    let path = explicit
        .clone()
        .unwrap_or_else(MindMateConfig::default_config_path);

    if explicit.is_none() && !path.is_file() {
        return Ok(MindMateConfig::default());
    }
    MindMateConfig::from_file(&path)
        .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", path.display()))
}
