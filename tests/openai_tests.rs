//! Remote caller tests against a mock OpenAI server.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use whisper_relay::config::AppConfig;
use whisper_relay::openai::{OpenAiClient, OpenAiError};

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(&AppConfig {
        api_key: "test-key".to_string(),
        api_base_url: server.uri(),
    })
}

#[tokio::test]
async fn transcribe_returns_plain_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello from whisper\n"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let text = client
        .transcribe(vec![0u8; 128], "clip.mp3")
        .await
        .unwrap();

    assert_eq!(text, "hello from whisper");
}

#[tokio::test]
async fn transcribe_surfaces_api_errors_distinctly() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .transcribe(vec![0u8; 128], "clip.mp3")
        .await
        .unwrap_err();

    match err {
        OpenAiError::Api { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("upstream exploded"));
        }
        other => panic!("expected an api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn chat_returns_text_and_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Formatted transcript."}}
            ],
            "usage": {"prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client.chat("system prompt", "raw transcript").await.unwrap();

    assert_eq!(output.text, "Formatted transcript.");
    assert_eq!(output.usage.prompt_tokens, 120);
    assert_eq!(output.usage.completion_tokens, 80);
}

#[tokio::test]
async fn chat_without_choices_is_a_payload_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"choices": [], "usage": null})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.chat("system", "user").await.unwrap_err();

    assert!(matches!(err, OpenAiError::Payload(_)));
}

#[tokio::test]
async fn chat_missing_usage_defaults_to_zero_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "text"}}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client.chat("system", "user").await.unwrap();

    assert_eq!(output.usage.prompt_tokens, 0);
    assert_eq!(output.usage.completion_tokens, 0);
}
