//! Forwarding client for the allow-listed upstream.

use reqwest::{header, Client};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::envelope::{self, ProxyMetadata};
use crate::error::ProxyError;
use crate::observability::metrics;

/// Forwards validated requests to the single allow-listed upstream.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http_client: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Build a client with bounded connect and request timeouts.
    pub fn new(config: UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .connect_timeout(timeouts.connect())
            .timeout(timeouts.upstream())
            .default_headers(forward_headers())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Check that `url` starts with the allow-listed origin.
    ///
    /// Prefix match only, the URL is not parsed.
    pub fn validate<'a>(&self, url: &'a str) -> Result<&'a str, ProxyError> {
        if url.starts_with(&self.config.allowed_origin) {
            Ok(url)
        } else {
            Err(ProxyError::DisallowedOrigin {
                upstream: self.config.name.clone(),
                provided: url.to_string(),
            })
        }
    }

    /// Usage hint returned when the `url` parameter is missing.
    pub fn usage(&self, endpoint_path: &str) -> String {
        format!(
            "GET {}?url={}2.3/questions?...",
            endpoint_path, self.config.allowed_origin
        )
    }

    /// Forward a GET and wrap the JSON body in the provenance envelope.
    #[instrument(skip(self), fields(upstream = %self.config.name))]
    pub async fn forward(&self, url: &str) -> Result<Value, ProxyError> {
        let url = self.validate(url)?;
        let start = Instant::now();

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        metrics::record_upstream(status.as_u16(), start);
        debug!(status = %status, "Upstream responded");

        if !status.is_success() {
            let text = response.text().await?;
            warn!(status = %status, "Upstream API error");
            return Err(ProxyError::upstream_http(&self.config.name, status, &text));
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        let metadata = ProxyMetadata::success(&self.config.service_label, url);
        Ok(envelope::wrap(body, &metadata))
    }
}

/// Fixed header set sent with every forwarded request (minus User-Agent).
pub fn forward_headers() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        header::HeaderValue::from_static("gzip, deflate, br"),
    );
    headers.insert(header::DNT, header::HeaderValue::from_static("1"));
    headers.insert(
        header::CONNECTION,
        header::HeaderValue::from_static("keep-alive"),
    );
    headers
}
