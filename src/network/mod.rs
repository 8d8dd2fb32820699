//! Network Module
//!
//! HTTP serving on top of axum and hyper.
//!
//! ## Architecture
//! - tokio listener, connections driven by hyper
//! - Requests routed through the application router
//! - Watch-channel shutdown shared with a [`ShutdownHandle`]

mod server;

pub use server::{Server, ShutdownHandle};
