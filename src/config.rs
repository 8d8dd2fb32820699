//! Configuration for SquirrelStore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, SquirrelError};

/// Main configuration for a SquirrelStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Backing file for the record store (one JSON line per record)
    pub db_path: PathBuf,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,

    /// Number of runtime worker threads serving requests
    pub workers: usize,

    /// Longest a single request may take before a 408 (milliseconds, 0 disables)
    pub request_timeout_ms: u64,

    /// Largest request body accepted (bytes)
    pub max_body_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./squirrel_db.db"),
            listen_addr: "127.0.0.1:8080".to_string(),
            workers: 8,
            request_timeout_ms: 10_000,
            max_body_size: 64 * 1024, // 64 KB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(SquirrelError::Config("db_path must not be empty".into()));
        }
        if self.listen_addr.trim().is_empty() {
            return Err(SquirrelError::Config("listen_addr must not be empty".into()));
        }
        if self.workers == 0 {
            return Err(SquirrelError::Config("workers must be at least 1".into()));
        }
        if self.max_body_size == 0 {
            return Err(SquirrelError::Config("max_body_size must be positive".into()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing database file
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of runtime worker threads (at least one)
    pub fn workers(mut self, count: usize) -> Self {
        self.config.workers = count.max(1);
        self
    }

    /// Set the per-request timeout (in milliseconds)
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    /// Set the maximum request body size (in bytes)
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.config.max_body_size = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
