//! Gateway process for the taskdeck dashboard.
//!
//! Hosts the compiled dashboard bundle and a set of thin proxy routes that
//! relay browser requests to the backend task API: status codes and JSON
//! bodies pass through verbatim, the `Authorization` header is forwarded
//! when present, and task identifiers are validated before anything touches
//! the upstream.

pub mod app;
pub mod config;
pub mod proxy;

pub use app::AppState;
pub use config::GatewayConfig;
