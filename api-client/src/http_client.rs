// HTTP client façade
//
// `call` runs one operation through the full pipeline: resolve the path,
// build a fresh envelope, run the request chain, dispatch with the
// configured timeout, then run the response chain. A timeout is shown to
// every failure hook but is never recovered or rewritten.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use rockgeo_core::{query_pairs, resolve_path, CallArgs, EndpointDescriptor, HttpMethod, PayloadShape};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::envelope::{parse_body, parse_header, MultipartBody, RequestBody, RequestEnvelope, ResponseEnvelope};
use crate::errors::ApiError;
use crate::interceptors::{LoggingInterceptor, RequestInterceptor, ResponseInterceptor};

/// Configurable REST client with ordered interceptor chains.
///
/// Interceptors can only be added through `&mut self`, so once a client is
/// shared the chains are read-only. Clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    default_headers: HeaderMap,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("timeout_ms", &self.config.timeout_ms)
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .finish()
    }
}

impl ApiClient {
    /// Create a client bound to `config`
    ///
    /// # Errors
    /// `ApiError::Config` when the base URL, timeout or a default header is
    /// invalid
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let (name, value) = parse_header(name, value)?;
            default_headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: Arc::new(config),
            default_headers,
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Append to the request chain
    pub fn add_request_interceptor<I>(&mut self, interceptor: I) -> &mut Self
    where
        I: RequestInterceptor + 'static,
    {
        self.request_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Append to the response chain
    pub fn add_response_interceptor<I>(&mut self, interceptor: I) -> &mut Self
    where
        I: ResponseInterceptor + 'static,
    {
        self.response_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Register `LoggingInterceptor` on both chains
    pub fn add_logging(&mut self) -> &mut Self {
        self.add_request_interceptor(LoggingInterceptor)
            .add_response_interceptor(LoggingInterceptor)
    }

    /// Invoke an endpoint and return the final response body
    pub async fn call(&self, descriptor: &EndpointDescriptor, args: CallArgs) -> Result<Value, ApiError> {
        self.send(descriptor, args).await.map(|response| response.body)
    }

    /// Invoke an endpoint and decode the final body into `T`
    pub async fn call_as<T>(&self, descriptor: &EndpointDescriptor, args: CallArgs) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let body = self.call(descriptor, args).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(format!("{}: {}", descriptor.name, e)))
    }

    /// Invoke an endpoint and return the whole final response envelope
    pub async fn send(&self, descriptor: &EndpointDescriptor, args: CallArgs) -> Result<ResponseEnvelope, ApiError> {
        let request = self.build_request(descriptor, args)?;
        let request = self.run_request_chain(request)?;
        let endpoint = request.endpoint;

        match self.dispatch(request).await {
            Err(timeout @ ApiError::Timeout { .. }) => {
                self.report_timeout(endpoint, &timeout);
                Err(timeout)
            }
            outcome => self.run_response_chain(outcome),
        }
    }

    /// Steps 1-2: resolve the path and build a fresh envelope
    fn build_request(&self, descriptor: &EndpointDescriptor, mut args: CallArgs) -> Result<RequestEnvelope, ApiError> {
        let path = resolve_path(descriptor.path_template, &mut args)?;
        let url = format!("{}{}", self.config.normalized_base_url(), path);
        let mut headers = self.default_headers.clone();
        let (values, files) = args.into_parts();

        let payload = match descriptor.method {
            HttpMethod::Get => PayloadShape::Query,
            HttpMethod::Post => descriptor.payload,
        };
        if !files.is_empty() && payload != PayloadShape::Multipart {
            return Err(ApiError::InvalidArgument(format!(
                "{} does not accept file uploads",
                descriptor.name
            )));
        }

        let (query, body) = match payload {
            PayloadShape::Query => (query_pairs(&values)?, RequestBody::Empty),
            PayloadShape::Json => {
                let body: Map<String, Value> = values.into_iter().collect();
                (Vec::new(), RequestBody::Json(Value::Object(body)))
            }
            PayloadShape::Multipart => {
                // the encoder sets its own boundary content type
                headers.remove(CONTENT_TYPE);
                let fields = query_pairs(&values)?;
                (Vec::new(), RequestBody::Multipart(MultipartBody { fields, files }))
            }
        };

        Ok(RequestEnvelope {
            endpoint: descriptor.name,
            method: descriptor.method,
            path,
            url,
            query,
            headers,
            body,
        })
    }

    fn run_request_chain(&self, request: RequestEnvelope) -> Result<RequestEnvelope, ApiError> {
        let mut state = Ok(request);
        for interceptor in &self.request_interceptors {
            state = match state {
                Ok(request) => interceptor.on_request(request),
                Err(error) => Err(interceptor.on_request_error(error)),
            };
        }
        state
    }

    /// Fold the outcome through the response chain.
    ///
    /// A failed request that is not recovered reaches the caller as
    /// `RequestFailed`, keeping the status and body of the original failure.
    fn run_response_chain(&self, outcome: Result<ResponseEnvelope, ApiError>) -> Result<ResponseEnvelope, ApiError> {
        let original = match &outcome {
            Err(ApiError::RequestFailed { status, raw_body, .. }) => Some((*status, raw_body.clone())),
            _ => None,
        };

        let mut state = outcome;
        for interceptor in &self.response_interceptors {
            state = match state {
                Ok(response) => interceptor.on_success(response),
                Err(error) => interceptor.on_failure(error),
            };
        }

        match (state, original) {
            (Err(error), Some((status, raw_body))) if !matches!(error, ApiError::RequestFailed { .. }) => {
                Err(ApiError::RequestFailed {
                    status,
                    message: error.to_string(),
                    raw_body,
                })
            }
            (state, _) => state,
        }
    }

    fn report_timeout(&self, endpoint: &str, timeout: &ApiError) {
        for interceptor in &self.response_interceptors {
            if interceptor.on_failure(timeout.clone()).is_ok() {
                tracing::debug!(endpoint, "timed-out call cannot be recovered");
            }
        }
    }

    /// Steps 4-5: send the envelope and classify the outcome
    async fn dispatch(&self, request: RequestEnvelope) -> Result<ResponseEnvelope, ApiError> {
        let endpoint = request.endpoint;
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.http.request(method, &request.url).headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(body) => builder.multipart(encode_multipart(body)?),
        };

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !(200..300).contains(&status) {
            return Err(ApiError::from_status(status, text));
        }

        Ok(ResponseEnvelope {
            endpoint,
            status,
            headers,
            body: parse_body(&text),
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else {
            ApiError::network(error.to_string())
        }
    }
}

fn encode_multipart(body: MultipartBody) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in body.fields {
        form = form.text(name, value);
    }
    for file in body.files {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|_| ApiError::InvalidArgument(format!("invalid content type `{}`", file.content_type)))?;
        form = form.part(file.field, part);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints;
    use rockgeo_core::FilePart;
    use serde_json::json;

    fn client() -> ApiClient {
        ApiClient::new(ClientConfig::new("http://localhost:5000/api/", 1000)).unwrap()
    }

    #[test]
    fn test_client_creation() {
        assert!(ApiClient::new(ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_client_creation_rejects_bad_header() {
        let config = ClientConfig::default().with_header("bad header", "x");
        assert!(matches!(ApiClient::new(config), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_build_get_request() {
        let request = client()
            .build_request(&endpoints::GET_ROCK_DETAIL, CallArgs::new().with("id", "42").with("lang", "zh"))
            .unwrap();
        assert_eq!(request.path, "/geo/rocks/42");
        assert_eq!(request.url, "http://localhost:5000/api/geo/rocks/42");
        assert_eq!(request.query, vec![("lang".to_string(), "zh".to_string())]);
        assert_eq!(request.body, RequestBody::Empty);
        assert_eq!(request.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_build_json_request() {
        let request = client()
            .build_request(&endpoints::SEND_CHAT_MESSAGE, CallArgs::new().with("query", "hi"))
            .unwrap();
        assert!(request.query.is_empty());
        assert_eq!(request.body, RequestBody::Json(json!({"query": "hi"})));
    }

    #[test]
    fn test_build_multipart_drops_json_content_type() {
        let file = FilePart {
            field: "file".to_string(),
            file_name: "a.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: b"abc".to_vec(),
        };
        let request = client()
            .build_request(&endpoints::UPLOAD_FILE, CallArgs::new().with("user", "u1").with_file(file))
            .unwrap();
        assert!(request.header("content-type").is_none());
        match request.body {
            RequestBody::Multipart(body) => {
                assert_eq!(body.fields, vec![("user".to_string(), "u1".to_string())]);
                assert_eq!(body.files.len(), 1);
            }
            other => panic!("Expected multipart body, got {:?}", other),
        }
    }

    #[test]
    fn test_files_rejected_on_get() {
        let file = FilePart {
            field: "file".to_string(),
            file_name: "a.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: Vec::new(),
        };
        let result = client().build_request(&endpoints::GET_3D_MODELS, CallArgs::new().with_file(file));
        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
    }

    #[test]
    fn test_missing_path_param() {
        let result = client().build_request(&endpoints::GET_ROCK_DETAIL, CallArgs::new());
        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
    }
}
