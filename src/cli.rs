use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "whisper-relay",
    about = "Whisper Relay - Audio Transcription over the OpenAI API",
    long_about = "An HTTP service that transcribes uploaded audio files via the OpenAI Whisper API, splitting oversized files into chunks, and reformats the transcript with GPT-4o. Also works as a client for uploading files to a running server.",
    after_help = "EXAMPLES:\n    # Start the transcription server (requires OPENAI_API_KEY)\n    whisper-relay serve\n\n    # Transcribe an audio file via a running server\n    whisper-relay file my_audio.mp3\n\n    # Format the transcript as speaker-labeled dialogue\n    whisper-relay file interview.mp3 --conversation\n\n    # Use a different server when in client mode\n    whisper-relay file audio.wav --server-url http://my-server:8080"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(name = "serve")]
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value = "8080")]
        port: u16,
    },
    #[command(name = "file")]
    TranscribeFile {
        audio_file: String,

        #[arg(long, default_value = "http://localhost:8080")]
        server_url: String,

        /// Reformat the transcript as speaker-labeled dialogue
        #[arg(long)]
        conversation: bool,
    },
}
