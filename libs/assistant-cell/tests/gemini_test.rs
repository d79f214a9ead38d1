// libs/assistant-cell/tests/gemini_test.rs
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assistant_cell::{AssistantError, Content, GeminiClient, LanguageModel};
use shared_utils::test_utils::TestConfig;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn client_for(mock_server: &MockServer) -> GeminiClient {
    GeminiClient::new(&TestConfig::with_gemini_url(&mock_server.uri()).to_app_config())
}

#[tokio::test]
async fn sends_history_tools_and_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-gemini-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "Hello!" }] } }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let content = client_for(&mock_server)
        .generate(&[Content::user_text("hi")])
        .await
        .unwrap()
        .expect("candidate");

    assert_eq!(content.parts[0].text.as_deref(), Some("Hello!"));
}

#[tokio::test]
async fn parses_function_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "functionCall": { "name": "list_all_doctors", "args": {} } }]
                }
            }]
        })))
        .mount(&mock_server)
        .await;

    let content = client_for(&mock_server)
        .generate(&[Content::user_text("who works here?")])
        .await
        .unwrap()
        .unwrap();

    let call = content.parts[0].function_call.as_ref().unwrap();
    assert_eq!(call.name, "list_all_doctors");
}

#[tokio::test]
async fn missing_candidates_are_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&mock_server)
        .await;

    let content = client_for(&mock_server)
        .generate(&[Content::user_text("blocked")])
        .await
        .unwrap();

    assert!(content.is_none());
}

#[tokio::test]
async fn quota_errors_are_rate_limits() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "status": "RESOURCE_EXHAUSTED", "message": "Quota exceeded" }
        })))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).generate(&[Content::user_text("hi")]).await;
    assert_matches!(result, Err(AssistantError::RateLimited(_)));
}

#[tokio::test]
async fn other_failures_keep_their_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).generate(&[Content::user_text("hi")]).await;
    assert_matches!(result, Err(AssistantError::Upstream { status: 500, .. }));
}

#[tokio::test]
async fn empty_key_is_not_configured() {
    let mut config = TestConfig::default().to_app_config();
    config.gemini_api_key = String::new();

    let result = GeminiClient::new(&config).generate(&[Content::user_text("hi")]).await;
    assert_matches!(result, Err(AssistantError::NotConfigured));
}
