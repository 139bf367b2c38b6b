//! Proxy endpoint and health handlers.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::ProxyError;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Path the proxy endpoint is mounted on.
pub const PROXY_PATH: &str = "/api/proxy";

/// Name of the query parameter carrying the target URL.
pub const URL_PARAM: &str = "url";

/// Single entry point for every method on [`PROXY_PATH`].
///
/// OPTIONS is answered before the method check; CORS headers are added by
/// the router layer on all paths.
pub async fn proxy_endpoint(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Response {
    if method == Method::OPTIONS {
        metrics::record_request("preflight");
        return StatusCode::OK.into_response();
    }

    if method != Method::GET {
        return reject(ProxyError::UnsupportedMethod);
    }

    match handle_get(&state, &uri).await {
        Ok(body) => {
            metrics::record_request("success");
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => reject(e),
    }
}

async fn handle_get(state: &AppState, uri: &Uri) -> Result<Value, ProxyError> {
    let upstream = &state.upstream;

    let url = target_url(uri).ok_or_else(|| ProxyError::MissingParameter {
        usage: upstream.usage(PROXY_PATH),
    })?;
    let url = upstream.validate(&url)?;

    tracing::info!(url = %url, "Proxying request");
    upstream.forward(url).await
}

fn reject(err: ProxyError) -> Response {
    match &err {
        ProxyError::Internal { message } => tracing::error!(error = %message, "Proxy error"),
        ProxyError::UpstreamHttp { status, .. } => {
            tracing::warn!(status = %status, "Upstream request failed")
        }
        _ => tracing::debug!(error = %err, "Request rejected"),
    }
    metrics::record_request(err.outcome());
    err.into_response()
}

/// First non-empty `url` query parameter, percent-decoded.
pub fn target_url(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == URL_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
