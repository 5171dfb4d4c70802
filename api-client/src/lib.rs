// API client library for the rock/geo backend and the AI chat service
//
// `ApiClient` is the generic façade: connection defaults, ordered
// interceptor chains and a single `call` pipeline. `RockApi` and `AiApi`
// expose the fixed endpoint catalog as typed async functions.

pub mod ai_api;
pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod errors;
pub mod http_client;
pub mod interceptors;
pub mod rock_api;

// Re-export commonly used items
pub use ai_api::{AiApi, FileUpload};
pub use config::{AiConfig, ClientConfig};
pub use envelope::{MultipartBody, RequestBody, RequestEnvelope, ResponseEnvelope};
pub use errors::ApiError;
pub use http_client::ApiClient;
pub use interceptors::{BearerAuthInterceptor, LoggingInterceptor, RequestInterceptor, ResponseInterceptor};
pub use rock_api::RockApi;
pub use rockgeo_core::{CallArgs, EndpointDescriptor, HttpMethod, PayloadShape};
