// Per-call request/response state passed through the interceptor chains

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use rockgeo_core::{FilePart, HttpMethod};
use serde_json::Value;

use crate::errors::ApiError;

/// Outgoing request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartBody),
}

/// multipart/form-data content, encoded at dispatch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

/// The outgoing request as seen by request interceptors.
///
/// Created fresh for every call and dropped once the call resolves.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    /// Catalog operation name
    pub endpoint: &'static str,
    pub method: HttpMethod,
    /// Resolved path relative to the base URL
    pub path: String,
    /// Absolute URL without the query string
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl RequestEnvelope {
    /// Insert or replace a header
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), ApiError> {
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The incoming response as seen by response interceptors
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub endpoint: &'static str,
    pub status: u16,
    pub headers: HeaderMap,
    /// Parsed body: JSON as-is, empty as null, other text as a string
    pub body: Value,
}

impl ResponseEnvelope {
    /// A synthetic 200 response, used by interceptors that recover a failure
    pub fn recovered(endpoint: &'static str, body: Value) -> Self {
        Self {
            endpoint,
            status: 200,
            headers: HeaderMap::new(),
            body,
        }
    }
}

/// Parse a body the way the call pipeline hands it to interceptors
pub(crate) fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ApiError> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ApiError::Config(format!("invalid header name `{}`", name)))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|_| ApiError::Config(format!("invalid value for header `{}`", name)))?;
    Ok((header_name, header_value))
}
