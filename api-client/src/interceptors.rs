// Request/response interceptors
//
// Chains run in registration order. A request interceptor that fails hands
// its error to every later interceptor's `on_request_error`. A response
// failure travels `on_failure` until an interceptor returns `Ok`, after
// which later interceptors see the value on `on_success`.

use crate::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::errors::ApiError;

/// Hook run on every outgoing request
pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, request: RequestEnvelope) -> Result<RequestEnvelope, ApiError> {
        Ok(request)
    }

    /// Called when an earlier request interceptor failed
    fn on_request_error(&self, error: ApiError) -> ApiError {
        error
    }
}

/// Hook run on every response or failed call
pub trait ResponseInterceptor: Send + Sync {
    fn on_success(&self, response: ResponseEnvelope) -> Result<ResponseEnvelope, ApiError> {
        Ok(response)
    }

    /// Return `Ok` to recover the call into a successful response
    fn on_failure(&self, error: ApiError) -> Result<ResponseEnvelope, ApiError> {
        Err(error)
    }
}

/// Structured request/response logging through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInterceptor;

impl RequestInterceptor for LoggingInterceptor {
    fn on_request(&self, request: RequestEnvelope) -> Result<RequestEnvelope, ApiError> {
        tracing::debug!(
            endpoint = request.endpoint,
            method = %request.method,
            url = %request.url,
            query = ?request.query,
            "sending request"
        );
        Ok(request)
    }

    fn on_request_error(&self, error: ApiError) -> ApiError {
        tracing::error!(error = %error, "request aborted");
        error
    }
}

impl ResponseInterceptor for LoggingInterceptor {
    fn on_success(&self, response: ResponseEnvelope) -> Result<ResponseEnvelope, ApiError> {
        tracing::debug!(
            endpoint = response.endpoint,
            status = response.status,
            "received response"
        );
        Ok(response)
    }

    fn on_failure(&self, error: ApiError) -> Result<ResponseEnvelope, ApiError> {
        match &error {
            ApiError::RequestFailed { status, message, .. } => {
                tracing::warn!(status = ?status, message = %message, "response error");
            }
            other => tracing::warn!(error = %other, "response error"),
        }
        Err(error)
    }
}

/// Adds `Authorization: Bearer <token>` to every request
#[derive(Clone)]
pub struct BearerAuthInterceptor {
    token: String,
}

impl BearerAuthInterceptor {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl std::fmt::Debug for BearerAuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuthInterceptor")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl RequestInterceptor for BearerAuthInterceptor {
    fn on_request(&self, mut request: RequestEnvelope) -> Result<RequestEnvelope, ApiError> {
        request.set_header("Authorization", &format!("Bearer {}", self.token))?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::RequestBody;
    use reqwest::header::HeaderMap;
    use rockgeo_core::HttpMethod;

    fn envelope() -> RequestEnvelope {
        RequestEnvelope {
            endpoint: "sendChatMessage",
            method: HttpMethod::Post,
            path: "/chat-messages".to_string(),
            url: "http://localhost:5000/api/dify/chat-messages".to_string(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    #[test]
    fn test_bearer_header_injected() {
        let request = BearerAuthInterceptor::new("app-key").on_request(envelope()).unwrap();
        assert_eq!(request.header("authorization"), Some("Bearer app-key"));
    }

    #[test]
    fn test_bearer_debug_redacts_token() {
        let debug = format!("{:?}", BearerAuthInterceptor::new("app-key"));
        assert!(!debug.contains("app-key"));
    }

    #[test]
    fn test_logging_passes_through() {
        let request = RequestInterceptor::on_request(&LoggingInterceptor, envelope()).unwrap();
        assert_eq!(request.path, "/chat-messages");

        let error = ApiError::network("connection refused");
        let result = ResponseInterceptor::on_failure(&LoggingInterceptor, error.clone());
        assert_eq!(result.unwrap_err(), error);

        let aborted = LoggingInterceptor.on_request_error(error.clone());
        assert_eq!(aborted, error);
    }
}
