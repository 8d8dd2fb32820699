//! SquirrelStore Server Binary
//!
//! Starts the HTTP server for SquirrelStore.

use std::sync::Arc;

use clap::Parser;
use squirrelstore::network::Server;
use squirrelstore::{Config, Result, SquirrelRepository};
use tracing_subscriber::{fmt, EnvFilter};

/// SquirrelStore Server
#[derive(Parser, Debug)]
#[command(name = "squirrelstore-server")]
#[command(about = "HTTP CRUD service for squirrel records")]
#[command(version)]
struct Args {
    /// Database file (created if missing)
    #[arg(short, long, default_value = "./squirrel_db.db")]
    db: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Runtime worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Per-request timeout in milliseconds (0 disables)
    #[arg(long, default_value = "10000")]
    request_timeout_ms: u64,

    /// Largest accepted request body in KB
    #[arg(long, default_value = "64")]
    max_body_kb: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,squirrelstore=debug,tower_http=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("SquirrelStore Server v{}", squirrelstore::VERSION);
    tracing::info!("Database file: {}", args.db);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .db_path(&args.db)
        .listen_addr(&args.listen)
        .workers(args.workers)
        .request_timeout_ms(args.request_timeout_ms)
        .max_body_size(args.max_body_kb * 1024)
        .build();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(serve(config)) {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn serve(config: Config) -> Result<()> {
    // Open repository
    let repo = Arc::new(SquirrelRepository::open(&config.db_path)?);
    tracing::info!("Repository initialized successfully");

    // Start server
    let server = Server::bind(config, repo).await?;
    let shutdown = server.shutdown_handle();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl-C");
                shutdown.shutdown();
            }
            Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    server.run().await
}
