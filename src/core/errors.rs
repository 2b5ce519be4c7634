use chrono::{DateTime, Utc};
use serde_json::json;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Reason attached to every rate-limit payload.
pub const RATE_LIMIT_REASON: &str = "Too many requests";

#[derive(Error, Debug)]
pub enum TwitterError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The API answered 429. `reset_timestamp` is the raw `x-rate-limit-reset`
    /// header value (unix seconds) when the server sent one.
    #[error("Rate limited on {endpoint} (reset: {reset_timestamp:?})")]
    RateLimited {
        reset_timestamp: Option<String>,
        endpoint: String,
    },

    /// Any other failing status. `payload` is already JSON-encoded.
    #[error("Request failed with status {status}: {payload}")]
    RequestFailed { status: u16, payload: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}

impl TwitterError {
    /// JSON payload carried by the API failure kinds.
    ///
    /// Rate limits render as `{"error","timestamp","uri"}`; other failures
    /// carry whatever the classifier encoded. Local errors have no payload.
    pub fn payload(&self) -> Option<String> {
        match self {
            Self::RateLimited {
                reset_timestamp,
                endpoint,
            } => Some(rate_limit_payload(reset_timestamp.as_deref(), endpoint)),
            Self::RequestFailed { payload, .. } => Some(payload.clone()),
            _ => None,
        }
    }

    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// When the rate limit window reopens, if the server told us.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::RateLimited {
                reset_timestamp: Some(ts),
                ..
            } => ts
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            _ => None,
        }
    }

    /// Time left until `reset_at`, or zero if it already passed.
    pub fn retry_after(&self) -> Option<Duration> {
        let reset = self.reset_at()?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        let reset_secs = u64::try_from(reset.timestamp()).ok()?;
        Some(Duration::from_secs(reset_secs.saturating_sub(now.as_secs())))
    }
}

fn rate_limit_payload(reset_timestamp: Option<&str>, endpoint: &str) -> String {
    json!({
        "error": RATE_LIMIT_REASON,
        "timestamp": reset_timestamp,
        "uri": endpoint,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_rate_limit_payload_shape() {
        let err = TwitterError::RateLimited {
            reset_timestamp: Some("1700000000".to_string()),
            endpoint: "users/me".to_string(),
        };

        let payload: Value = serde_json::from_str(&err.payload().unwrap()).unwrap();
        assert_eq!(payload["error"], "Too many requests");
        assert_eq!(payload["timestamp"], "1700000000");
        assert_eq!(payload["uri"], "users/me");
        assert_eq!(err.status(), Some(429));
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_rate_limit_without_header_has_null_timestamp() {
        let err = TwitterError::RateLimited {
            reset_timestamp: None,
            endpoint: "tweets".to_string(),
        };

        let payload: Value = serde_json::from_str(&err.payload().unwrap()).unwrap();
        assert!(payload["timestamp"].is_null());
        assert!(err.reset_at().is_none());
        assert!(err.retry_after().is_none());
    }

    #[test]
    fn test_reset_at_parses_unix_seconds() {
        let err = TwitterError::RateLimited {
            reset_timestamp: Some("1700000000".to_string()),
            endpoint: "users/me".to_string(),
        };

        let reset = err.reset_at().unwrap();
        assert_eq!(reset.timestamp(), 1_700_000_000);
        // Long in the past, so there is nothing left to wait
        assert_eq!(err.retry_after(), Some(Duration::ZERO));
    }

    #[test]
    fn test_retry_after_counts_down_to_future_reset() {
        let reset = Utc::now().timestamp() + 3600;
        let err = TwitterError::RateLimited {
            reset_timestamp: Some(reset.to_string()),
            endpoint: "users/me".to_string(),
        };

        let wait = err.retry_after().unwrap();
        assert!(wait > Duration::ZERO);
        assert!(wait <= Duration::from_secs(3600));
    }

    #[test]
    fn test_local_errors_have_no_payload() {
        let err = TwitterError::AuthError("bearer token not set".to_string());
        assert!(err.payload().is_none());
        assert!(err.status().is_none());
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_request_failed_display() {
        let err = TwitterError::RequestFailed {
            status: 403,
            payload: "\"forbidden\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request failed with status 403: \"forbidden\""
        );
    }
}
