//! Classification of the direct attempt.

use reqwest::StatusCode;
use serde_json::Value;

/// Statuses that mean direct access is being denied.
pub const BLOCKING_STATUSES: [StatusCode; 3] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::FORBIDDEN,
    StatusCode::SERVICE_UNAVAILABLE,
];

/// Result of the direct leg, consumed by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectOutcome {
    /// 2xx with a parsed JSON body.
    Success(Value),
    /// Blocking signal; retry once through the proxy.
    Blocked(StatusCode),
    /// Any other non-2xx; no fallback.
    Failed(StatusCode),
}

impl DirectOutcome {
    /// Classify a non-success status. Success is handled by the caller
    /// because it needs the body.
    pub fn from_failure(status: StatusCode) -> Self {
        if is_blocking(status) {
            Self::Blocked(status)
        } else {
            Self::Failed(status)
        }
    }
}

pub fn is_blocking(status: StatusCode) -> bool {
    BLOCKING_STATUSES.contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_three_statuses_block() {
        assert_eq!(
            DirectOutcome::from_failure(StatusCode::TOO_MANY_REQUESTS),
            DirectOutcome::Blocked(StatusCode::TOO_MANY_REQUESTS)
        );
        assert_eq!(
            DirectOutcome::from_failure(StatusCode::FORBIDDEN),
            DirectOutcome::Blocked(StatusCode::FORBIDDEN)
        );
        assert_eq!(
            DirectOutcome::from_failure(StatusCode::SERVICE_UNAVAILABLE),
            DirectOutcome::Blocked(StatusCode::SERVICE_UNAVAILABLE)
        );

        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::GATEWAY_TIMEOUT,
        ] {
            assert_eq!(DirectOutcome::from_failure(status), DirectOutcome::Failed(status));
        }
    }
}
