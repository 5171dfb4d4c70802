use rockgeo_api_client::config::{DEFAULT_AI_API_TIMEOUT_MS, DEFAULT_API_BASE_URL};
use rockgeo_api_client::{AiConfig, ApiError, ClientConfig};
use serial_test::serial;

const VARS: &[&str] = &[
    "API_BASE_URL",
    "API_TIMEOUT_MS",
    "AI_API_BASE_URL",
    "AI_API_TIMEOUT_MS",
    "AI_API_KEY",
    "AI_USER",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_client_config_defaults() {
    clear_env();
    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.timeout_ms, 5000);
}

#[test]
#[serial]
fn test_client_config_from_env() {
    clear_env();
    std::env::set_var("API_BASE_URL", "https://geo.example.com/api");
    std::env::set_var("API_TIMEOUT_MS", "1500");

    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.base_url, "https://geo.example.com/api");
    assert_eq!(config.timeout_ms, 1500);
    clear_env();
}

#[test]
#[serial]
fn test_client_config_invalid_timeout() {
    clear_env();
    std::env::set_var("API_TIMEOUT_MS", "soon");
    assert!(matches!(ClientConfig::from_env(), Err(ApiError::Config(_))));

    std::env::set_var("API_TIMEOUT_MS", "0");
    assert!(matches!(ClientConfig::from_env(), Err(ApiError::Config(_))));
    clear_env();
}

#[test]
#[serial]
fn test_ai_config_requires_key() {
    clear_env();
    assert!(matches!(AiConfig::from_env(), Err(ApiError::Config(_))));

    std::env::set_var("AI_API_KEY", "   ");
    assert!(matches!(AiConfig::from_env(), Err(ApiError::Config(_))));
    clear_env();
}

#[test]
#[serial]
fn test_ai_config_from_env() {
    clear_env();
    std::env::set_var("AI_API_BASE_URL", "https://ai.example.com/v1");
    std::env::set_var("AI_API_KEY", "app-from-env");
    std::env::set_var("AI_USER", "lab-1");

    let config = AiConfig::from_env().unwrap();
    assert_eq!(config.client.base_url, "https://ai.example.com/v1");
    assert_eq!(config.client.timeout_ms, DEFAULT_AI_API_TIMEOUT_MS);
    assert_eq!(config.api_key, "app-from-env");
    assert_eq!(config.user.as_deref(), Some("lab-1"));
    clear_env();
}
