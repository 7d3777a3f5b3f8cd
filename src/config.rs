use anyhow::{Context, Result};
use dotenv::dotenv;

pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Process-wide configuration, built once at startup and passed into the
/// server. Missing credentials are a fatal startup error.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable not set")?;
        let api_base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        Ok(Self {
            api_key,
            api_base_url,
        })
    }
}

#[derive(Debug)]
pub struct ClientConfig {
    pub server_url: String,
    pub audio_file: String,
    pub conversation_mode: bool,
}
