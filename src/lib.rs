//! # SquirrelStore
//!
//! A small HTTP CRUD service for squirrel records with:
//! - A line-oriented flat-file store with atomic whole-file saves
//! - A repository that validates fields and assigns never-reused ids
//! - An axum route table mapping verbs and paths to operations
//! - A tokio/hyper HTTP server with graceful shutdown
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server                             │
//! │              (axum::serve on tokio)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   axum Router                                │
//! │          (Handlers → status codes)                           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 SquirrelRepository                           │
//! │        (Validation, ids, serialized writes)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    RecordStore                               │
//! │            (One JSON line per record)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod repository;
pub mod router;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorResponse, SquirrelError, Result};
pub use config::Config;
pub use repository::{SquirrelFields, SquirrelRecord, SquirrelRepository};
pub use router::build_router;
pub use store::RecordStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SquirrelStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
