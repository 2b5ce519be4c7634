//! Maps an HTTP outcome onto success, generic failure, or rate-limit failure.

use crate::core::errors::TwitterError;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::warn;

pub const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// Message used when a failing status falls outside the 4xx/5xx ranges
pub const UNCLASSIFIED_FAILURE_MESSAGE: &str = "cURL error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    RateLimited,
    ClientError,
    ServerError,
    /// Status >= 400 that is neither a client nor a server error
    Unclassified,
}

impl ResponseClass {
    pub fn of(status: StatusCode) -> Self {
        let code = status.as_u16();
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited
        } else if code < 400 {
            Self::Success
        } else if status.is_client_error() {
            Self::ClientError
        } else if status.is_server_error() {
            Self::ServerError
        } else {
            Self::Unclassified
        }
    }
}

/// Turn a raw response into the caller-facing outcome.
///
/// Success bodies are decoded strictly; a body that is not JSON is an error,
/// never an empty result. 4xx/5xx bodies are carried verbatim as a JSON
/// string so the caller sees exactly what the server said.
pub fn classify_response(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
    endpoint: &str,
) -> Result<Value, TwitterError> {
    match ResponseClass::of(status) {
        ResponseClass::Success => Ok(serde_json::from_str(body)?),
        ResponseClass::RateLimited => {
            let reset_timestamp = headers
                .get(RATE_LIMIT_RESET_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            warn!(
                endpoint,
                reset = reset_timestamp.as_deref().unwrap_or("unknown"),
                "Rate limit hit"
            );

            Err(TwitterError::RateLimited {
                reset_timestamp,
                endpoint: endpoint.to_string(),
            })
        }
        ResponseClass::ClientError | ResponseClass::ServerError => {
            Err(TwitterError::RequestFailed {
                status: status.as_u16(),
                payload: serde_json::to_string(body)?,
            })
        }
        ResponseClass::Unclassified => {
            let decoded: Value = serde_json::from_str(body)?;

            let mut error = json!({ "message": UNCLASSIFIED_FAILURE_MESSAGE });
            if is_truthy(&decoded) {
                error["details"] = Value::String(body.to_string());
            }

            Err(TwitterError::RequestFailed {
                status: status.as_u16(),
                payload: error.to_string(),
            })
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }

    #[test]
    fn test_response_class_boundaries() {
        assert_eq!(ResponseClass::of(status(200)), ResponseClass::Success);
        assert_eq!(ResponseClass::of(status(204)), ResponseClass::Success);
        assert_eq!(ResponseClass::of(status(304)), ResponseClass::Success);
        assert_eq!(ResponseClass::of(status(400)), ResponseClass::ClientError);
        assert_eq!(ResponseClass::of(status(429)), ResponseClass::RateLimited);
        assert_eq!(ResponseClass::of(status(503)), ResponseClass::ServerError);
        assert_eq!(ResponseClass::of(status(600)), ResponseClass::Unclassified);
    }

    #[test]
    fn test_success_passes_body_through() {
        let value =
            classify_response(status(200), &HeaderMap::new(), r#"{"data":{"id":"1"}}"#, "users/me")
                .unwrap();
        assert_eq!(value, json!({"data": {"id": "1"}}));
    }

    #[test]
    fn test_success_array_body() {
        let value = classify_response(status(200), &HeaderMap::new(), "[1,2]", "x").unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn test_malformed_success_body_is_json_error() {
        let err =
            classify_response(status(200), &HeaderMap::new(), "<html>", "users/me").unwrap_err();
        assert!(matches!(err, TwitterError::JsonError(_)));

        let err = classify_response(status(200), &HeaderMap::new(), "", "users/me").unwrap_err();
        assert!(matches!(err, TwitterError::JsonError(_)));
    }

    #[test]
    fn test_rate_limit_reads_reset_header() {
        let mut headers = HeaderMap::new();
        headers.insert(RATE_LIMIT_RESET_HEADER, HeaderValue::from_static("1700000000"));

        let err = classify_response(status(429), &headers, "{}", "users/me").unwrap_err();
        match err {
            TwitterError::RateLimited {
                reset_timestamp,
                endpoint,
            } => {
                assert_eq!(reset_timestamp.as_deref(), Some("1700000000"));
                assert_eq!(endpoint, "users/me");
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[test]
    fn test_rate_limit_ignores_body_content() {
        // Not even valid JSON; the status alone decides
        let err = classify_response(status(429), &HeaderMap::new(), "slow down", "tweets")
            .unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_client_error_wraps_raw_body_as_json_string() {
        let body = r#"{"title":"Forbidden","status":403}"#;
        let err = classify_response(status(403), &HeaderMap::new(), body, "users/me").unwrap_err();

        match err {
            TwitterError::RequestFailed { status, payload } => {
                assert_eq!(status, 403);
                assert_eq!(payload, serde_json::to_string(body).unwrap());
                let decoded: String = serde_json::from_str(&payload).unwrap();
                assert_eq!(decoded, body);
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_server_error_with_non_json_body() {
        let err = classify_response(status(502), &HeaderMap::new(), "Bad Gateway", "tweets")
            .unwrap_err();
        assert_eq!(err.payload().as_deref(), Some("\"Bad Gateway\""));
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_unclassified_status_synthesizes_message() {
        let err =
            classify_response(status(600), &HeaderMap::new(), r#"{"a":1}"#, "x").unwrap_err();
        let payload: Value = serde_json::from_str(&err.payload().unwrap()).unwrap();
        assert_eq!(payload["message"], "cURL error");
        assert_eq!(payload["details"], r#"{"a":1}"#);

        let err = classify_response(status(600), &HeaderMap::new(), "null", "x").unwrap_err();
        let payload: Value = serde_json::from_str(&err.payload().unwrap()).unwrap();
        assert!(payload.get("details").is_none());
    }

    #[test]
    fn test_unclassified_status_still_decodes_strictly() {
        let err = classify_response(status(600), &HeaderMap::new(), "nope", "x").unwrap_err();
        assert!(matches!(err, TwitterError::JsonError(_)));
    }
}
