//! HTTP Server
//!
//! Binds the listener and serves the application router until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::config::Config;
use crate::error::{Result, SquirrelError};
use crate::repository::SquirrelRepository;
use crate::router::build_router;

/// HTTP server for SquirrelStore
///
/// ## Threading Model
/// - Connections are driven by hyper on the tokio runtime the caller runs
///   [`Server::run`] on; the binary sizes it from `Config::workers`
/// - Repository calls run on tokio's blocking pool
///
/// ## Shutdown
/// Triggering a [`ShutdownHandle`] stops accepting, closes idle keep-alive
/// connections, and lets in-flight requests finish before `run` returns.
pub struct Server {
    /// Server configuration
    config: Config,

    /// Application router
    app: axum::Router,

    /// Bound listener
    listener: TcpListener,

    /// Flipped to `true` to stop the server
    shutdown: Arc<watch::Sender<bool>>,
}

/// Cloneable trigger for a graceful shutdown
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Signal the server to shut down gracefully
    pub fn shutdown(&self) {
        self.sender.send_replace(true);
    }
}

impl Server {
    /// Validate the config and bind its listen address
    pub async fn bind(config: Config, repo: Arc<SquirrelRepository>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr).await.map_err(|e| {
            SquirrelError::Network(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;

        let app = build_router(repo, &config);
        let (sender, _) = watch::channel(false);

        Ok(Self {
            config,
            app,
            listener,
            shutdown: Arc::new(sender),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that stops this server; clone it into other tasks
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            sender: Arc::clone(&self.shutdown),
        }
    }

    /// Get the server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Serve until shutdown is signalled
    pub async fn run(self) -> Result<()> {
        tracing::info!("Listening on http://{}", self.local_addr()?);

        let mut signal = self.shutdown.subscribe();
        let stopped = async move {
            loop {
                if *signal.borrow_and_update() {
                    break;
                }
                if signal.changed().await.is_err() {
                    break;
                }
            }
            tracing::info!("Shutting down, draining open connections");
        };

        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(stopped)
            .await
            .map_err(|e| SquirrelError::Network(format!("server failed: {}", e)))?;

        tracing::info!("Server stopped");

        Ok(())
    }
}
