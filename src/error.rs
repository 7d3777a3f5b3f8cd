//! Request pipeline error taxonomy.
//!
//! Remote-service failures are kept distinct from internal failures so the
//! handler can log and report them differently. Post-processing failures
//! never appear here: they are recovered inside the pipeline by falling back
//! to the raw transcript.

use thiserror::Error;

use crate::audio::probe::AudioProbeError;
use crate::openai::OpenAiError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The remote transcription call failed. No partial transcript is
    /// usable, so this aborts the request.
    #[error("transcription service error: {0}")]
    Transcription(OpenAiError),

    #[error("failed to read audio duration: {0}")]
    Probe(#[from] AudioProbeError),

    #[error("chunk export failed: {0}")]
    ChunkExport(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Transcription(_))
    }
}
