//! The per-request transcription pipeline.
//!
//! Strictly sequential: persist the upload, probe its duration, plan chunks
//! against the upload ceiling, transcribe (per chunk when split), post-process
//! with a chat completion, and account the cost. Each request owns its
//! temporary files exclusively; nothing is shared across requests.

use std::io::Write;
use std::path::Path;

use log::{error, info};

use crate::audio::chunker::{self, ChunkPlan};
use crate::audio::probe;
use crate::cleanup::CleanupList;
use crate::error::PipelineError;
use crate::openai::OpenAiClient;
use crate::{pricing, prompts};

/// An uploaded audio file plus the request's formatting flag.
#[derive(Debug)]
pub struct UploadedAudio {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub conversation_mode: bool,
}

#[derive(Debug)]
pub struct TranscribeOutcome {
    pub transcript: String,
    pub cost: f64,
}

/// Run the full pipeline for one upload. Temporary files created along the
/// way are scheduled for deferred deletion whether the pipeline succeeds or
/// not.
pub async fn run(
    client: &OpenAiClient,
    upload: UploadedAudio,
) -> Result<TranscribeOutcome, PipelineError> {
    let mut cleanup = CleanupList::new();
    let outcome = process(client, upload, &mut cleanup).await;
    cleanup.schedule();
    outcome
}

async fn process(
    client: &OpenAiClient,
    upload: UploadedAudio,
    cleanup: &mut CleanupList,
) -> Result<TranscribeOutcome, PipelineError> {
    let UploadedAudio {
        filename,
        bytes,
        conversation_mode,
    } = upload;

    info!("Received transcription request for file: {filename}");

    let upload_path = persist_upload(&filename, &bytes)?;
    info!("File saved successfully at {}", upload_path.display());

    let duration_ms = probe::probe_duration_ms(&upload_path)?;
    let transcription_cost = pricing::transcription_cost(duration_ms);
    info!(
        "Audio duration: {:.2} minutes, estimated cost: ${:.4}",
        duration_ms as f64 / 60_000.0,
        transcription_cost
    );

    let file_size = bytes.len() as u64;
    info!("Audio file size: {:.2} MB", file_size as f64 / (1024.0 * 1024.0));

    let full_transcript = match chunker::plan_chunks(file_size, duration_ms, chunker::MAX_UPLOAD_BYTES)
    {
        ChunkPlan::Whole => {
            info!("File size is within limits. Transcribing directly...");
            client
                .transcribe(bytes, &filename)
                .await
                .map_err(PipelineError::Transcription)?
        }
        ChunkPlan::Split(spans) => {
            info!(
                "File size exceeds {} MB. Splitting audio into {} chunks...",
                chunker::MAX_UPLOAD_BYTES / (1024 * 1024),
                spans.len()
            );
            transcribe_in_chunks(client, &upload_path, &spans, cleanup).await?
        }
    };

    cleanup.register(upload_path);

    // Post-processing failures must not fail the request: fall back to the
    // raw transcript and the transcription-only cost.
    let system_prompt = prompts::system_prompt(conversation_mode);
    if conversation_mode {
        info!("Conversation mode enabled. Formatting for speakers...");
    } else {
        info!("Conversation mode disabled. Formatting for readability...");
    }

    let (transcript, cost) = match client.chat(system_prompt, &full_transcript).await {
        Ok(output) => {
            let chat_cost = pricing::chat_cost(&output.usage);
            info!("Post-processing cost: ${chat_cost:.4}");
            (output.text, transcription_cost + chat_cost)
        }
        Err(e) => {
            error!("Post-processing failed, returning raw transcript: {e}");
            (full_transcript, transcription_cost)
        }
    };

    info!("Total estimated cost: ${cost:.4}");

    Ok(TranscribeOutcome { transcript, cost })
}

/// Write the upload to a scoped temporary file, keeping the original
/// extension so the container format stays recognizable.
fn persist_upload(filename: &str, bytes: &[u8]) -> Result<tempfile::TempPath, PipelineError> {
    let suffix = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    let mut file = tempfile::Builder::new()
        .prefix("whisper-relay-upload-")
        .suffix(&suffix)
        .tempfile()?;
    file.write_all(bytes)?;
    Ok(file.into_temp_path())
}

/// Export and transcribe every span in index order; transcripts are joined
/// with single spaces. Any failed transcription call aborts the request.
async fn transcribe_in_chunks(
    client: &OpenAiClient,
    src: &Path,
    spans: &[chunker::ChunkSpan],
    cleanup: &mut CleanupList,
) -> Result<String, PipelineError> {
    let mut transcripts = Vec::with_capacity(spans.len());

    for span in spans {
        let chunk_path = tempfile::Builder::new()
            .prefix("whisper-relay-chunk-")
            .suffix(".mp3")
            .tempfile()?
            .into_temp_path();

        chunker::export_chunk(src, span, &chunk_path).await?;
        info!("Created chunk file: {}", chunk_path.display());

        let chunk_bytes = tokio::fs::read(&chunk_path).await?;
        let text = client
            .transcribe(chunk_bytes, &format!("chunk-{}.mp3", span.index))
            .await
            .map_err(PipelineError::Transcription)?;
        info!("Transcription complete for chunk {}.", span.index);

        transcripts.push(text);
        cleanup.register(chunk_path);
    }

    info!("All chunks transcribed and combined.");
    Ok(transcripts.join(" "))
}
