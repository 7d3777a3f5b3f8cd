//! Fixed pricing for the remote services. No dynamic lookup; rates match the
//! published OpenAI prices (gpt-4o as of July 2024).

use crate::openai::TokenUsage;

/// Whisper API price per minute of audio, in USD.
pub const WHISPER_PRICE_PER_MINUTE: f64 = 0.006;

pub const GPT4O_PRICE_PER_INPUT_TOKEN: f64 = 5.00 / 1_000_000.0;
pub const GPT4O_PRICE_PER_OUTPUT_TOKEN: f64 = 15.00 / 1_000_000.0;

/// Estimated cost of transcribing `duration_ms` of audio.
pub fn transcription_cost(duration_ms: u64) -> f64 {
    let duration_minutes = duration_ms as f64 / 60_000.0;
    duration_minutes * WHISPER_PRICE_PER_MINUTE
}

/// Cost of a chat completion given its reported token usage.
pub fn chat_cost(usage: &TokenUsage) -> f64 {
    usage.prompt_tokens as f64 * GPT4O_PRICE_PER_INPUT_TOKEN
        + usage.completion_tokens as f64 * GPT4O_PRICE_PER_OUTPUT_TOKEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_minutes_of_audio_costs_six_cents() {
        let cost = transcription_cost(10 * 60 * 1000);
        assert!((cost - 0.06).abs() < 1e-12);
    }

    #[test]
    fn chat_cost_combines_prompt_and_completion_rates() {
        let usage = TokenUsage {
            prompt_tokens: 1_000_000,
            completion_tokens: 1_000_000,
        };
        assert!((chat_cost(&usage) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_costs_nothing() {
        assert_eq!(transcription_cost(0), 0.0);
    }
}
