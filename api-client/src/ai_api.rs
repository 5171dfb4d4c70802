// Typed AI chat API
//
// Uses its own ApiClient with a bearer-token interceptor; the token comes
// from AiConfig.

use std::path::Path;

use rockgeo_core::{CallArgs, ChatMessageRequest, ChatMessageResponse, ConnectionStatus, FilePart, FileUploadResponse};

use crate::config::AiConfig;
use crate::endpoints;
use crate::errors::ApiError;
use crate::http_client::ApiClient;
use crate::interceptors::BearerAuthInterceptor;

const PROBE_MESSAGE: &str = "Hello, this is a test message";

/// A file to upload to the AI service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing the content type from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::InvalidArgument(format!("cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ApiError::InvalidArgument(format!("{} has no file name", path.display())))?
            .to_string();
        let content_type = content_type_for(path).to_string();

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    fn into_part(self) -> FilePart {
        FilePart {
            field: "file".to_string(),
            file_name: self.file_name,
            content_type: self.content_type,
            bytes: self.bytes,
        }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// AI chat operations
#[derive(Debug, Clone)]
pub struct AiApi {
    client: ApiClient,
    user: Option<String>,
}

impl AiApi {
    pub fn new(config: AiConfig) -> Result<Self, ApiError> {
        let mut client = ApiClient::new(config.client)?;
        client.add_request_interceptor(BearerAuthInterceptor::new(config.api_key));
        Ok(Self {
            client,
            user: config.user,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Register interceptors before the API is shared
    pub fn client_mut(&mut self) -> &mut ApiClient {
        &mut self.client
    }

    /// POST /chat-messages in blocking mode
    pub async fn send_chat_message(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatMessageResponse, ApiError> {
        let request = ChatMessageRequest::blocking(message, conversation_id, self.user_id("user"));
        let args = CallArgs::from_serialize(&request)?;
        self.client.call_as(&endpoints::SEND_CHAT_MESSAGE, args).await
    }

    /// POST /files/upload as multipart
    pub async fn upload_file(&self, file: FileUpload) -> Result<FileUploadResponse, ApiError> {
        let args = CallArgs::new()
            .with("user", self.user_id("user"))
            .with_file(file.into_part());
        self.client.call_as(&endpoints::UPLOAD_FILE, args).await
    }

    /// Send a probe message and report the outcome instead of failing
    pub async fn test_connection(&self) -> ConnectionStatus {
        let request = ChatMessageRequest::standalone(PROBE_MESSAGE, self.user_id("test-user"));
        let args = match CallArgs::from_serialize(&request) {
            Ok(args) => args,
            Err(e) => return ConnectionStatus::failed(e.to_string()),
        };

        match self.client.call(&endpoints::SEND_CHAT_MESSAGE, args).await {
            Ok(data) => {
                tracing::info!("AI connection test succeeded");
                ConnectionStatus::ok(data)
            }
            Err(error) => {
                tracing::warn!(error = %error, "AI connection test failed");
                match error {
                    ApiError::RequestFailed {
                        raw_body: Some(body), ..
                    } => ConnectionStatus::failed(body),
                    other => ConnectionStatus::failed(other.to_string()),
                }
            }
        }
    }

    fn user_id(&self, prefix: &str) -> String {
        self.user
            .clone()
            .unwrap_or_else(|| format!("{}-{}", prefix, chrono::Utc::now().timestamp_millis()))
    }
}
