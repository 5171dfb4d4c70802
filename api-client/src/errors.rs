// API client errors

use rockgeo_core::ArgumentError;

/// API client error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Missing path parameter or malformed argument; nothing was sent
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The call exceeded the configured timeout
    #[error("request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// Non-2xx status or network failure
    #[error("request failed: {message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
        raw_body: Option<String>,
    },

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Payload did not match the expected response type
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a `RequestFailed` from a non-2xx response body.
    ///
    /// The message is taken from a JSON `detail` or `message` field when
    /// present.
    pub fn from_status(status: u16, raw_body: String) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&raw_body)
            .ok()
            .and_then(|body| {
                ["detail", "message"]
                    .iter()
                    .find_map(|key| body.get(key).and_then(|v| v.as_str()).map(str::to_string))
            })
            .unwrap_or_else(|| format!("HTTP {}", status));

        ApiError::RequestFailed {
            status: Some(status),
            message,
            raw_body: (!raw_body.is_empty()).then_some(raw_body),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ApiError::RequestFailed {
            status: None,
            message: message.into(),
            raw_body: None,
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<ArgumentError> for ApiError {
    fn from(error: ArgumentError) -> Self {
        ApiError::InvalidArgument(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // RequestFailed construction
    // ========================================

    #[test]
    fn test_from_status_uses_detail_field() {
        let error = ApiError::from_status(404, r#"{"detail":"Sample not found: R-9"}"#.to_string());
        assert_eq!(error.status(), Some(404));
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "request failed: Sample not found: R-9");
    }

    #[test]
    fn test_from_status_uses_message_field() {
        let error = ApiError::from_status(401, r#"{"code":"unauthorized","message":"Access token is invalid"}"#.to_string());
        assert_eq!(error.to_string(), "request failed: Access token is invalid");
    }

    #[test]
    fn test_from_status_plain_body() {
        let error = ApiError::from_status(502, "bad gateway".to_string());
        match error {
            ApiError::RequestFailed { status, message, raw_body } => {
                assert_eq!(status, Some(502));
                assert_eq!(message, "HTTP 502");
                assert_eq!(raw_body.as_deref(), Some("bad gateway"));
            }
            other => panic!("Expected RequestFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_from_status_empty_body() {
        let error = ApiError::from_status(500, String::new());
        assert!(matches!(error, ApiError::RequestFailed { raw_body: None, .. }));
    }

    #[test]
    fn test_argument_error_conversion() {
        let error: ApiError = ArgumentError::MissingPathParam("id".to_string()).into();
        assert_eq!(
            error,
            ApiError::InvalidArgument("missing required path parameter `id`".to_string())
        );
    }

    #[test]
    fn test_timeout_display() {
        let error = ApiError::Timeout { timeout_ms: 5000 };
        assert_eq!(error.to_string(), "request timed out after 5000 ms");
    }
}
