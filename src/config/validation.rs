//! Configuration validation.
//!
//! Semantic checks only; serde handles the syntactic side. All problems
//! are collected and returned together.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("upstream.allowed_origin must start with http:// or https:// (got '{0}')")]
    InvalidOrigin(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.upstream_secs ({upstream}) must be less than timeouts.request_secs ({request})")]
    UpstreamNotBelowRequest { upstream: u64, request: u64 },

    #[error("fallback.timeout_secs ({fallback}) must be greater than timeouts.upstream_secs ({upstream})")]
    FallbackNotAboveUpstream { fallback: u64, upstream: u64 },

    #[error("fallback.proxy_url '{value}' is not a valid URL: {reason}")]
    InvalidProxyUrl { value: String, reason: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let origin = &config.upstream.allowed_origin;
    if !(origin.starts_with("http://") || origin.starts_with("https://")) {
        errors.push(ValidationError::InvalidOrigin(origin.clone()));
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.upstream_secs", timeouts.upstream_secs),
        ("timeouts.request_secs", timeouts.request_secs),
        ("fallback.timeout_secs", config.fallback.timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }
    // The inbound TimeoutLayer answers with a bare 408, so the upstream
    // timeout has to fire first.
    if timeouts.upstream_secs >= timeouts.request_secs {
        errors.push(ValidationError::UpstreamNotBelowRequest {
            upstream: timeouts.upstream_secs,
            request: timeouts.request_secs,
        });
    }
    // Same on the client side: the proxy's structured 500 must arrive
    // before the fallback leg gives up.
    if config.fallback.timeout_secs <= timeouts.upstream_secs {
        errors.push(ValidationError::FallbackNotAboveUpstream {
            fallback: config.fallback.timeout_secs,
            upstream: timeouts.upstream_secs,
        });
    }

    if let Err(e) = url::Url::parse(&config.fallback.proxy_url) {
        errors.push(ValidationError::InvalidProxyUrl {
            value: config.fallback.proxy_url.clone(),
            reason: e.to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
