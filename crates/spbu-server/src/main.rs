//! SPBU Server — application entry point.

use anyhow::Context;
use clap::Parser;
use spbu_db::Database;
use spbu_server::{AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spbu=info")),
        )
        .json()
        .init();

    let config = ServerConfig::parse();
    let db = Database::new();
    if config.seed_demo {
        spbu_db::seed_demo(&db, config.pepper.as_deref())
            .await
            .context("seeding demo data")?;
    }

    let state = AppState::new(db, config.auth_config());
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    spbu_server::serve(listener, state).await?;

    tracing::info!("SPBU server stopped.");
    Ok(())
}
