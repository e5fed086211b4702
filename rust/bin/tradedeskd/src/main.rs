//! `tradedeskd`: the TradeDesk server binary.
//!
//! Usage:
//!   tradedeskd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/tradedesk/<name>.toml`.
//! If a path with `/` or `.toml` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tradedesk_core::Module;
use tracing::info;

use config::ServerConfig;

/// TradeDesk server.
#[derive(Parser, Debug)]
#[command(name = "tradedeskd", about = "TradeDesk server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = tradedesk_core::ServiceConfig {
        data_dir: Some(data_dir),
        listen: cli.listen.clone(),
        ..Default::default()
    };

    let db_path = core_config.resolve_db_path();
    let kv: Arc<dyn tradedesk_kv::KVStore> = Arc::new(
        tradedesk_kv::RedbStore::open(&db_path)
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );
    info!("Opened store at {}", db_path.display());

    let identity = tradedesk_identity::IdentityModule::new(server_config.identity_config());
    info!("Identity module initialized ({} users)", server_config.users.len());

    let masters = tradedesk_masters::MastersModule::new(Arc::clone(&kv));
    info!("Masters module initialized");

    let module_routes = vec![
        (identity.name().to_string(), identity.routes()),
        (masters.name().to_string(), masters.routes()),
    ];

    let app = routes::build_router(identity.service(), module_routes, tradedesk_masters::schema());

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("TradeDesk server listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
