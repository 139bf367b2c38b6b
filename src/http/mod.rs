//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → handlers.rs (method check, url parameter)
//!     → upstream (validate, forward, wrap)
//!     → cors.rs (headers on every response)
//!     → Send to client
//! ```

pub mod cors;
pub mod handlers;
pub mod request;
pub mod server;

pub use handlers::{PROXY_PATH, URL_PARAM};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
