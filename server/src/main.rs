//! Zolo License Server
//!
//! Issues, activates and revokes license codes over HTTP.
//!
//! Usage:
//!   zolo-server --port 8000 --database licenses.db --admin-key <KEY>
//!
//! Without `--database` licenses are kept in memory and lost on exit.
//! Without `--admin-key` every admin endpoint answers 401.

use std::{path::PathBuf, sync::Arc};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zolo_license::{
    AdminGate, LicenseConfig, LicenseService, LicenseStore, MemoryStore, SqliteStore,
    DEFAULT_MAX_PLAN_QUANTITY,
};
use zolo_server::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "zolo-server")]
#[command(about = "Zolo license issuance and activation server")]
struct Args {
    /// Address to bind
    #[arg(long, env = "ZOLO_HOST", default_value = "0.0.0.0")]
    host: String,

    /// HTTP port
    #[arg(short, long, env = "ZOLO_PORT", default_value = "8000")]
    port: u16,

    /// SQLite database path (in-memory store if omitted)
    #[arg(short, long, env = "ZOLO_DATABASE")]
    database: Option<PathBuf>,

    /// Admin key required by /admin endpoints
    #[arg(long, env = "ZOLO_ADMIN_KEY", hide_env_values = true)]
    admin_key: Option<String>,

    /// Accept activations from any device once a license is bound
    #[arg(long, env = "ZOLO_MULTI_DEVICE")]
    multi_device: bool,

    /// Largest plan quantity accepted on create
    #[arg(long, env = "ZOLO_MAX_PLAN_QUANTITY", default_value_t = DEFAULT_MAX_PLAN_QUANTITY)]
    max_plan_quantity: u32,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .init();

    info!("Zolo license server starting...");

    let store: Arc<dyn LicenseStore> = match &args.database {
        Some(path) => {
            info!("Opening license database at {:?}", path);
            Arc::new(SqliteStore::open(path).context("Failed to open license database")?)
        }
        None => {
            warn!("No database configured, licenses are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let gate = AdminGate::new(args.admin_key.clone());
    if !gate.is_configured() {
        warn!("No admin key configured, admin endpoints will reject every request");
    }

    let config = LicenseConfig {
        multi_device: args.multi_device,
        max_plan_quantity: args.max_plan_quantity,
        ..LicenseConfig::default()
    };
    info!(
        multi_device = config.multi_device,
        max_plan_quantity = config.max_plan_quantity,
        "License policy loaded"
    );

    let app = build_router(AppState::new(LicenseService::new(store, config), gate));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Zolo license server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
