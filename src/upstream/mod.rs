//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! url parameter
//!     → client.rs validate (allow-listed origin prefix)
//!     → client.rs forward (fixed headers, bounded timeout)
//!     → 2xx: envelope::wrap
//!     → non-2xx: ProxyError::UpstreamHttp (body truncated)
//! ```

pub mod client;

pub use client::{forward_headers, UpstreamClient};
