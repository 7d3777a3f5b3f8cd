use anyhow::Result;
use clap::Parser;
use log::error;

use whisper_relay::cli::{Cli, Commands};
use whisper_relay::client::run_client;
use whisper_relay::config::{AppConfig, ClientConfig};
use whisper_relay::server::run_server;

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let config = match AppConfig::from_env() {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to load configuration: {e}");
                    std::process::exit(1);
                }
            };
            run_server(config, host, port).await?;
        }
        Commands::TranscribeFile {
            audio_file,
            server_url,
            conversation,
        } => {
            let config = ClientConfig {
                server_url,
                audio_file,
                conversation_mode: conversation,
            };
            run_client(config).await?;
        }
    }

    Ok(())
}
