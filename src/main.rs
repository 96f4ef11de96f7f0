use std::sync::Arc;

use color_eyre::eyre::{Context, Result};
use crl_registry::{
    config::Config,
    pki::crl::CrlRegistry,
    server::{Server, ServerConfig},
    storage::{MemoryStorage, RedisStorage, Storage},
    telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = Config::load()?;
    tracing::info!("Loaded configuration: {:?}", config);

    match &config.redis {
        Some(redis) => {
            let conn = redis.start().await.context("Connecting to Redis")?;
            serve(RedisStorage::new(conn), &config).await
        }
        None => {
            tracing::warn!("No Redis configured, CRLs are kept in memory and lost on restart");
            serve(MemoryStorage::new(), &config).await
        }
    }
}

async fn serve<S: Storage>(storage: S, config: &Config) -> Result<()> {
    let registry = Arc::new(CrlRegistry::new(storage));

    // Never answer revocation queries from a partially loaded index
    registry
        .populate()
        .await
        .context("Loading CRLs from storage")?;
    tracing::info!(crls = ?registry.names().await, "CRL registry ready");

    let server_config = ServerConfig {
        host: &config.server.host,
        port: config.server.port,
    };
    let server = Server::new(registry, server_config).await?;
    server.run().await
}
