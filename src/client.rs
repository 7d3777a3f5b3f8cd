use std::fs;
use std::path::Path;

use anyhow::{Result, anyhow};

use crate::config::ClientConfig;
use crate::dto::TranscriptDto;

pub async fn send_transcription_request(config: &ClientConfig) -> Result<TranscriptDto> {
    let client = reqwest::Client::new();

    let path = Path::new(&config.audio_file);
    if !path.exists() {
        return Err(anyhow!("Audio file not found: {}", config.audio_file));
    }
    let audio_data =
        fs::read(path).map_err(|e| anyhow!("Failed to read audio file: {}", e))?;

    println!(
        "📁 Audio file: {} ({} bytes)",
        config.audio_file,
        audio_data.len()
    );

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();

    let form = reqwest::multipart::Form::new()
        .part(
            "file",
            reqwest::multipart::Part::bytes(audio_data).file_name(filename),
        )
        .text(
            "conversation_mode",
            config.conversation_mode.to_string(),
        );

    println!(
        "🚀 Sending transcription request to: {}/transcribe",
        config.server_url
    );
    println!("   Conversation mode: {}", config.conversation_mode);

    let response = client
        .post(format!("{}/transcribe", config.server_url))
        .multipart(form)
        .send()
        .await
        .map_err(|e| anyhow!("Failed to send request: {}", e))?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read response: {}", e))?;

    if !status.is_success() {
        return Err(anyhow!(
            "Server returned error {}: {}",
            status,
            response_text
        ));
    }

    let dto: TranscriptDto = serde_json::from_str(&response_text)
        .map_err(|e| anyhow!("Failed to parse JSON response: {}", e))?;

    Ok(dto)
}

pub async fn check_server_health(server_url: &str) -> Result<()> {
    let client = reqwest::Client::new();

    println!("🔍 Checking server health at: {server_url}/api/ping");

    let response = client
        .get(format!("{server_url}/api/ping"))
        .send()
        .await
        .map_err(|e| anyhow!("Failed to connect to server: {}", e))?;

    if response.status().is_success() {
        println!("✅ Server is healthy");
        Ok(())
    } else {
        Err(anyhow!("Server health check failed: {}", response.status()))
    }
}

pub async fn run_client(config: ClientConfig) -> Result<()> {
    println!("🎵 Whisper Relay Client");
    println!("=======================");
    println!("📁 File: {}", config.audio_file);
    if config.conversation_mode {
        println!("🗣️  Conversation mode: speaker-labeled dialogue");
    }
    println!();

    if let Err(e) = check_server_health(&config.server_url).await {
        eprintln!("❌ {e}");
        eprintln!("💡 Make sure the server is running: whisper-relay serve");
        return Err(e);
    }

    match send_transcription_request(&config).await {
        Ok(result) => {
            println!("\n✅ Transcription completed!");
            println!("💰 Estimated cost: ${:.4}", result.cost);
            println!("📝 Transcript:");
            println!("{}", result.transcript);
        }
        Err(e) => {
            eprintln!("❌ Transcription failed: {e}");
            return Err(e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::dto::TranscriptDto;

    #[test]
    fn response_payload_round_trips() {
        let body = r#"{"transcript":"Speaker 1: Hello.","cost":0.0712}"#;
        let dto: TranscriptDto = serde_json::from_str(body).unwrap();
        assert_eq!(dto.transcript, "Speaker 1: Hello.");
        assert!((dto.cost - 0.0712).abs() < 1e-9);
    }
}
