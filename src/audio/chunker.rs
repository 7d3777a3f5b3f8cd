//! Size-based audio chunking.
//!
//! The Whisper API rejects uploads over 25 MB. Files above the ceiling are
//! sliced into time-contiguous chunks sized from the file's average bitrate
//! and re-encoded to mp3 with ffmpeg, each chunk landing safely under the
//! ceiling.

use std::path::Path;

use log::debug;
use tokio::process::Command;

use crate::error::PipelineError;

/// Max file size accepted by the Whisper API (25 MB).
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Chunks are targeted at 80% of the ceiling; re-encoding can shift the
/// effective bitrate, so the slack keeps exported chunks under the limit.
pub const EXPORT_SAFETY_FACTOR: f64 = 0.80;

/// Floor on the computed chunk duration. A pathological size/duration ratio
/// would otherwise produce a zero-length slice and a loop that never
/// advances.
pub const MIN_CHUNK_MS: u64 = 1_000;

/// A contiguous time slice of the source audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl ChunkSpan {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ChunkPlan {
    /// The file fits under the ceiling; transcribe it in one call.
    Whole,
    /// Ordered spans covering the whole timeline with no gaps or overlaps.
    Split(Vec<ChunkSpan>),
}

/// Decide how to submit a file of `file_size` bytes spanning `duration_ms`
/// against a byte-size ceiling.
pub fn plan_chunks(file_size: u64, duration_ms: u64, ceiling_bytes: u64) -> ChunkPlan {
    if file_size <= ceiling_bytes || duration_ms == 0 {
        return ChunkPlan::Whole;
    }

    let bytes_per_ms = file_size as f64 / duration_ms as f64;
    let target_ms = ((ceiling_bytes as f64 * EXPORT_SAFETY_FACTOR) / bytes_per_ms) as u64;
    let target_ms = target_ms.max(MIN_CHUNK_MS);

    let mut spans = Vec::new();
    let mut start_ms = 0;
    while start_ms < duration_ms {
        let end_ms = (start_ms + target_ms).min(duration_ms);
        spans.push(ChunkSpan {
            index: spans.len(),
            start_ms,
            end_ms,
        });
        start_ms = end_ms;
    }

    ChunkPlan::Split(spans)
}

/// Export one span of `src` as an mp3 file at `dest` via ffmpeg.
pub async fn export_chunk(src: &Path, span: &ChunkSpan, dest: &Path) -> Result<(), PipelineError> {
    let start = format!("{:.3}", span.start_ms as f64 / 1000.0);
    let length = format!("{:.3}", span.duration_ms() as f64 / 1000.0);

    debug!(
        "Exporting chunk {}: {}ms..{}ms from {} to {}",
        span.index,
        span.start_ms,
        span.end_ms,
        src.display(),
        dest.display()
    );

    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y"])
        .args(["-ss", &start, "-t", &length])
        .arg("-i")
        .arg(src)
        .args(["-f", "mp3"])
        .arg(dest)
        .output()
        .await
        .map_err(|e| PipelineError::ChunkExport(format!("failed to run ffmpeg: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PipelineError::ChunkExport(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}
