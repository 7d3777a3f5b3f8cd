//! End-to-end pipeline tests against a mock OpenAI server.
//!
//! Uploads here fit under the chunking ceiling, so the pipeline takes the
//! whole-file path; chunk planning itself is covered by unit tests.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use whisper_relay::config::AppConfig;
use whisper_relay::openai::{OpenAiClient, TokenUsage};
use whisper_relay::pipeline::{self, UploadedAudio};
use whisper_relay::pricing;

/// Minimal PCM WAV container holding `seconds` of 16kHz mono silence.
fn wav_fixture(seconds: u32) -> Vec<u8> {
    let sample_rate: u32 = 16_000;
    let data_len = sample_rate * seconds * 2;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);
    bytes
}

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(&AppConfig {
        api_key: "test-key".to_string(),
        api_base_url: server.uri(),
    })
}

fn upload(conversation_mode: bool) -> UploadedAudio {
    UploadedAudio {
        filename: "meeting.wav".to_string(),
        bytes: wav_fixture(2),
        conversation_mode,
    }
}

#[tokio::test]
async fn small_file_is_transcribed_in_one_call_and_post_processed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("raw words from whisper"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Clean, readable paragraphs."}}
            ],
            "usage": {"prompt_tokens": 100, "completion_tokens": 50, "total_tokens": 150}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = pipeline::run(&client, upload(false)).await.unwrap();

    assert_eq!(outcome.transcript, "Clean, readable paragraphs.");

    let expected = pricing::transcription_cost(2_000)
        + pricing::chat_cost(&TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 50,
        });
    assert!((outcome.cost - expected).abs() < 1e-12);
}

#[tokio::test]
async fn post_processing_failure_falls_back_to_the_raw_transcript() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("raw words from whisper"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = pipeline::run(&client, upload(true)).await.unwrap();

    assert_eq!(outcome.transcript, "raw words from whisper");

    let expected = pricing::transcription_cost(2_000);
    assert!((outcome.cost - expected).abs() < 1e-12);
}

#[tokio::test]
async fn transcription_failure_aborts_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = pipeline::run(&client, upload(false)).await.unwrap_err();

    assert!(err.is_remote());
}

#[tokio::test]
async fn garbage_uploads_are_internal_errors() {
    let server = MockServer::start().await;

    let client = client_for(&server);
    let err = pipeline::run(
        &client,
        UploadedAudio {
            filename: "junk.bin".to_string(),
            bytes: b"not an audio container".to_vec(),
            conversation_mode: false,
        },
    )
    .await
    .unwrap_err();

    assert!(!err.is_remote());
}
