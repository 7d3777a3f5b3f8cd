use std::path::Path;

use log::{debug, info};
use reqwest::multipart;
use thiserror::Error;

use crate::config::AppConfig;
use crate::openai::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatOutput,
};

const TRANSCRIPTION_MODEL: &str = "whisper-1";
const CHAT_MODEL: &str = "gpt-4o";

#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("api returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response payload: {0}")]
    Payload(String),
}

/// Client for the two remote capabilities this service consumes: the Whisper
/// transcription endpoint and the chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Transcribe one encoded audio file, returning plain text.
    ///
    /// Each call is attempted exactly once; failures surface to the caller.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
    ) -> Result<String, OpenAiError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = multipart::Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str(mime_for(filename))
            .map_err(|e| OpenAiError::Request(format!("mime: {e}")))?;

        let form = multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .text("response_format", "text")
            .part("file", file_part);

        debug!("Sending {filename} to the Whisper API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| OpenAiError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let transcript = response
            .text()
            .await
            .map_err(|e| OpenAiError::Request(format!("body: {e}")))?;

        info!(
            "Whisper transcription completed: {} characters",
            transcript.len()
        );

        Ok(transcript.trim().to_string())
    }

    /// Run a chat completion with a system instruction and one user turn.
    pub async fn chat(&self, system: &str, user: &str) -> Result<ChatOutput, OpenAiError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatCompletionRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
        };

        debug!("Sending transcript to {CHAT_MODEL} for post-processing");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OpenAiError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| OpenAiError::Payload(e.to_string()))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OpenAiError::Payload("no completion choices returned".to_string()))?;

        let usage = completion.usage.unwrap_or_default();

        info!(
            "Chat completion finished: {} prompt tokens, {} completion tokens",
            usage.prompt_tokens, usage.completion_tokens
        );

        Ok(ChatOutput { text, usage })
    }
}

async fn api_error(response: reqwest::Response) -> OpenAiError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    OpenAiError::Api { status, body }
}

fn mime_for(filename: &str) -> &'static str {
    match Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        _ => "application/octet-stream",
    }
}
