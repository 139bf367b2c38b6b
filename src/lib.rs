//! Allow-listed forwarding proxy with a direct-first fallback client.

pub mod config;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use error::{FallbackError, ProxyError};
pub use fallback::FallbackClient;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
