// crates/vlx-rs-tokio/src/lib.rs

//! Tokio runtime for `vlx-rs`.
//!
//! Provides the session keep-alive [`Heartbeat`], a stream based
//! [`Connection`] implementing [`vlx_rs::Session`], the shared
//! [`NodeRegistry`] and the client configuration.

pub mod config;
pub mod connection;
pub mod heartbeat;
pub mod registry;

pub use config::{ConfigError, ConnectionConfig, GatewayConfig, HeartbeatConfig};
pub use connection::Connection;
pub use heartbeat::Heartbeat;
pub use registry::NodeRegistry;
