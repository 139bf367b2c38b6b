//! Direct-first HTTP client with a single proxy fallback hop.

use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::FallbackConfig;
use crate::envelope;
use crate::error::FallbackError;
use crate::fallback::outcome::DirectOutcome;
use crate::http::URL_PARAM;
use crate::observability::metrics;

/// User agent sent on the proxy leg.
const PROXY_USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " via Proxy"
);

/// Calls the upstream directly and falls back to the proxy endpoint on
/// blocking signals (429, 403, 503).
#[derive(Debug, Clone)]
pub struct FallbackClient {
    http_client: Client,
    proxy_url: Url,
}

impl FallbackClient {
    /// Build a client whose legs are each bounded by `config.timeout_secs`.
    pub fn new(config: &FallbackConfig) -> Result<Self, FallbackError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FallbackError::Client)?;
        Self::with_client(http_client, &config.proxy_url)
    }

    /// Use an existing `reqwest::Client` for both legs.
    pub fn with_client(http_client: Client, proxy_url: &str) -> Result<Self, FallbackError> {
        Ok(Self {
            http_client,
            proxy_url: Url::parse(proxy_url)?,
        })
    }

    /// Proxy endpoint URL carrying `target` as its percent-encoded `url` parameter.
    ///
    /// Encoding is `application/x-www-form-urlencoded`, so a space becomes `+`
    /// rather than `%20`. The proxy decodes the query the same way.
    pub fn proxy_request_url(&self, target: &str) -> Url {
        let mut url = self.proxy_url.clone();
        url.query_pairs_mut().append_pair(URL_PARAM, target);
        url
    }

    /// Fetch `url` directly, re-issuing through the proxy at most once.
    #[instrument(skip(self, headers))]
    pub async fn fetch_with_fallback(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<Value, FallbackError> {
        debug!("Attempting direct request");
        let outcome = self.direct(url, headers).await?;
        self.dispatch(url, outcome).await
    }

    async fn direct(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<DirectOutcome, FallbackError> {
        let response = self
            .http_client
            .get(url)
            .headers(to_header_map(headers)?)
            .send()
            .await
            .map_err(FallbackError::Direct)?;

        let status = response.status();
        if !status.is_success() {
            return Ok(DirectOutcome::from_failure(status));
        }

        let text = response.text().await.map_err(FallbackError::Direct)?;
        Ok(DirectOutcome::Success(serde_json::from_str(&text)?))
    }

    async fn dispatch(&self, url: &str, outcome: DirectOutcome) -> Result<Value, FallbackError> {
        match outcome {
            DirectOutcome::Success(body) => {
                debug!("Direct request successful");
                metrics::record_fallback("direct");
                Ok(body)
            }
            DirectOutcome::Blocked(status) => {
                info!(status = %status, "Direct request blocked, trying proxy fallback");
                let result = self.fetch_via_proxy(url).await;
                metrics::record_fallback(if result.is_ok() { "proxy" } else { "failed" });
                result
            }
            DirectOutcome::Failed(status) => {
                warn!(status = %status, "Direct request failed, no fallback for this status");
                metrics::record_fallback("failed");
                Err(FallbackError::UnrecoverableUpstreamStatus(status))
            }
        }
    }

    /// Fetch `url` through the proxy endpoint and strip the envelope.
    pub async fn fetch_via_proxy(&self, url: &str) -> Result<Value, FallbackError> {
        let proxy_url = self.proxy_request_url(url);

        let response = self
            .http_client
            .get(proxy_url)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, PROXY_USER_AGENT)
            .send()
            .await
            .map_err(FallbackError::ProxyUnreachable)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(FallbackError::ProxyUnreachable)?;

        if !status.is_success() {
            warn!(status = %status, "Proxy request failed");
            return Err(FallbackError::ProxyStatus { status, body: text });
        }

        let mut body: Value = serde_json::from_str(&text)?;
        if let Some(meta) = envelope::strip(&mut body) {
            debug!(
                service = %meta.service,
                timestamp = %meta.timestamp,
                "Proxy metadata"
            );
        }
        Ok(body)
    }
}

fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, FallbackError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| FallbackError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| FallbackError::InvalidHeader(name.clone()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
