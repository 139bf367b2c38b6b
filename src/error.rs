//! Error types for the proxy endpoint and the fallback client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::envelope::iso_timestamp;

/// Maximum number of characters of an upstream error body echoed back.
pub const ERROR_BODY_LIMIT: usize = 500;

/// Failures the proxy endpoint turns into structured JSON responses.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No `url` query parameter (or an empty one).
    #[error("Missing URL parameter")]
    MissingParameter { usage: String },

    /// URL does not start with the allow-listed origin.
    #[error("Invalid URL - only {upstream} URLs are allowed")]
    DisallowedOrigin { upstream: String, provided: String },

    /// Upstream answered with a non-2xx status.
    #[error("{upstream} request failed")]
    UpstreamHttp {
        upstream: String,
        status: StatusCode,
        message: String,
    },

    /// Network, timeout or decoding failure while forwarding.
    #[error("Proxy service error")]
    Internal { message: String },

    /// Any method other than GET or OPTIONS.
    #[error("Method not allowed")]
    UnsupportedMethod,
}

impl ProxyError {
    /// Build an upstream failure, truncating the echoed body.
    pub fn upstream_http(upstream: impl Into<String>, status: StatusCode, body: &str) -> Self {
        Self::UpstreamHttp {
            upstream: upstream.into(),
            status,
            message: truncate_chars(body, ERROR_BODY_LIMIT),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter { .. } | Self::DisallowedOrigin { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::UpstreamHttp { status, .. } => *status,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UnsupportedMethod => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Short outcome label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "missing_url",
            Self::DisallowedOrigin { .. } => "disallowed_origin",
            Self::UpstreamHttp { .. } => "upstream_error",
            Self::Internal { .. } => "internal_error",
            Self::UnsupportedMethod => "method_not_allowed",
        }
    }

    fn body(&self) -> serde_json::Value {
        let error = self.to_string();
        match self {
            Self::MissingParameter { usage } => json!({ "error": error, "usage": usage }),
            Self::DisallowedOrigin { provided, .. } => {
                json!({ "error": error, "provided": provided })
            }
            Self::UpstreamHttp {
                status, message, ..
            } => json!({
                "error": error,
                "status": status.as_u16(),
                "message": message,
            }),
            Self::Internal { message } => json!({
                "error": error,
                "message": message,
                "timestamp": iso_timestamp(),
            }),
            Self::UnsupportedMethod => json!({ "error": error }),
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Failures surfaced by [`crate::fallback::FallbackClient`].
#[derive(Debug, Error)]
pub enum FallbackError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The direct request could not be sent or its body read.
    #[error("Direct request failed: {0}")]
    Direct(#[source] reqwest::Error),

    /// Upstream answered with a status that does not warrant the proxy hop.
    #[error("Upstream API error: {}", .0.as_u16())]
    UnrecoverableUpstreamStatus(StatusCode),

    /// The proxy endpoint itself could not be reached.
    #[error("Proxy unreachable: {0}")]
    ProxyUnreachable(#[source] reqwest::Error),

    /// The proxy endpoint answered with a non-2xx status.
    #[error("Proxy request failed: {} - {body}", .status.as_u16())]
    ProxyStatus { status: StatusCode, body: String },

    /// A response body was not valid JSON.
    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// A caller-supplied header could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The configured proxy endpoint URL is malformed.
    #[error("Invalid proxy URL: {0}")]
    InvalidProxyUrl(#[from] url::ParseError),
}

impl FallbackError {
    /// Status code carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnrecoverableUpstreamStatus(status) => Some(*status),
            Self::ProxyStatus { status, .. } => Some(*status),
            Self::Direct(e) | Self::ProxyUnreachable(e) => e.status(),
            _ => None,
        }
    }
}

/// Keep at most `limit` characters of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
