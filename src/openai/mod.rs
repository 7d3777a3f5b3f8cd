pub mod client;
pub mod types;

pub use client::{OpenAiClient, OpenAiError};
pub use types::{ChatOutput, TokenUsage};
