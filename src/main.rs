//! `shelf-server`: runs the catalog over HTTP
//!
//! The configuration path is taken from the first argument, then from
//! `SHELF_CONFIG`. Without either the built-in development configuration is
//! used.

use anyhow::{Context, Result};
use shelf::config::LibraryConfig;
use shelf::server::ServerBuilder;
use tracing_subscriber::{EnvFilter, fmt};

fn load_config() -> Result<LibraryConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SHELF_CONFIG").ok());

    match path {
        Some(path) => LibraryConfig::from_yaml_file(&path)
            .with_context(|| format!("failed to load configuration from {path}")),
        None => Ok(LibraryConfig::default_config()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    // logging
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_filter));
    fmt().with_env_filter(env_filter).init();

    let bind = config.server.bind.clone();
    tracing::info!(bind = %bind, media = %config.media.root.display(), "starting shelf-server");

    ServerBuilder::new().with_config(config).serve(&bind).await
}
