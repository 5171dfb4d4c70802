use mockito::Matcher;
use rockgeo_api_client::{AiApi, AiConfig, ApiError, ClientConfig, FileUpload};
use serde_json::json;
use serial_test::serial;

// ========================================
// Test helpers
// ========================================

fn disable_proxy_for_test() {
    std::env::remove_var("HTTP_PROXY");
    std::env::remove_var("HTTPS_PROXY");
    std::env::remove_var("http_proxy");
    std::env::remove_var("https_proxy");
    std::env::set_var("NO_PROXY", "localhost,127.0.0.1");
}

fn ai_api(server: &mockito::Server) -> AiApi {
    let mut config = AiConfig::new(ClientConfig::new(server.url(), 2000), "app-test-key");
    config.user = Some("geo-lab".to_string());
    AiApi::new(config).unwrap()
}

// ========================================
// sendChatMessage
// ========================================

#[tokio::test]
#[serial]
async fn test_send_chat_message_success() {
    disable_proxy_for_test();
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/chat-messages")
        .match_header("authorization", "Bearer app-test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "inputs": {},
            "query": "这块砂岩形成于什么环境？",
            "response_mode": "blocking",
            "conversation_id": "conv-1",
            "user": "geo-lab"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "event": "message",
                "message_id": "m-1",
                "conversation_id": "conv-1",
                "mode": "chat",
                "answer": "河流相沉积环境。",
                "metadata": {"usage": {"total_tokens": 42}},
                "created_at": 1700000000
            })
            .to_string(),
        )
        .create_async()
        .await;

    let response = ai_api(&server)
        .send_chat_message("这块砂岩形成于什么环境？", Some("conv-1"))
        .await
        .unwrap();

    assert_eq!(response.answer, "河流相沉积环境。");
    assert_eq!(response.conversation_id.as_deref(), Some("conv-1"));
    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_send_chat_message_without_conversation() {
    disable_proxy_for_test();
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/chat-messages")
        .match_body(Matcher::PartialJson(json!({"conversation_id": ""})))
        .with_status(200)
        .with_body(json!({"answer": "ok", "conversation_id": "new-conv"}).to_string())
        .create_async()
        .await;

    let response = ai_api(&server).send_chat_message("hi", None).await.unwrap();
    assert_eq!(response.conversation_id.as_deref(), Some("new-conv"));
    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_send_chat_message_unauthorized() {
    disable_proxy_for_test();
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat-messages")
        .with_status(401)
        .with_body(json!({"code": "unauthorized", "message": "Access token is invalid", "status": 401}).to_string())
        .create_async()
        .await;

    let error = ai_api(&server).send_chat_message("hi", None).await.unwrap_err();
    match error {
        ApiError::RequestFailed { status, message, .. } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "Access token is invalid");
        }
        other => panic!("Expected RequestFailed, got {:?}", other),
    }
}

// ========================================
// uploadFile
// ========================================

#[tokio::test]
#[serial]
async fn test_upload_file_multipart() {
    disable_proxy_for_test();
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/files/upload")
        .match_header("authorization", "Bearer app-test-key")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="notes.txt""#.to_string()),
            Matcher::Regex("龙门山断裂带".to_string()),
            Matcher::Regex(r#"name="user""#.to_string()),
        ]))
        .with_status(201)
        .with_body(
            json!({
                "id": "file-1",
                "name": "notes.txt",
                "size": 18,
                "extension": "txt",
                "mime_type": "text/plain",
                "created_by": "geo-lab",
                "created_at": 1700000000
            })
            .to_string(),
        )
        .create_async()
        .await;

    let upload = FileUpload::new("notes.txt", "text/plain", "龙门山断裂带".as_bytes().to_vec());
    let response = ai_api(&server).upload_file(upload).await.unwrap();

    assert_eq!(response.id, "file-1");
    assert_eq!(response.mime_type.as_deref(), Some("text/plain"));
    mock.assert_async().await;
}

// ========================================
// testConnection
// ========================================

#[tokio::test]
#[serial]
async fn test_connection_success() {
    disable_proxy_for_test();
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat-messages")
        .match_body(Matcher::Json(json!({
            "inputs": {},
            "query": "Hello, this is a test message",
            "response_mode": "blocking",
            "user": "geo-lab"
        })))
        .with_status(200)
        .with_body(json!({"answer": "Hello!"}).to_string())
        .create_async()
        .await;

    let status = ai_api(&server).test_connection().await;
    assert!(status.success);
    assert_eq!(status.data.unwrap()["answer"], "Hello!");
    assert!(status.error.is_none());
}

#[tokio::test]
#[serial]
async fn test_connection_failure_reports_body() {
    disable_proxy_for_test();
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat-messages")
        .with_status(503)
        .with_body("service unavailable")
        .create_async()
        .await;

    let status = ai_api(&server).test_connection().await;
    assert!(!status.success);
    assert_eq!(status.error.as_deref(), Some("service unavailable"));
}
