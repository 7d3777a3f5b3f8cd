use actix_cors::Cors;
use actix_multipart::{Field, Multipart};
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, post, web};
use futures_util::TryStreamExt;
use log::{debug, error, warn};

use crate::config::AppConfig;
use crate::dto::TranscriptDto;
use crate::openai::OpenAiClient;
use crate::pipeline::{self, UploadedAudio};

pub struct AppState {
    pub openai: OpenAiClient,
}

#[get("/api/ping")]
pub async fn ping() -> impl Responder {
    debug!("Ping endpoint called");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "Backend is up and running"
    }))
}

#[post("/transcribe")]
pub async fn transcribe(data: web::Data<AppState>, mut payload: Multipart) -> impl Responder {
    debug!("Transcription request received");

    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename = String::from("upload");
    let mut conversation_mode = false;

    // Process multipart fields
    while let Some(field) = payload.try_next().await.unwrap_or(None) {
        match field.name() {
            Some("file") => {
                if let Some(name) = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                {
                    filename = name.to_string();
                }
                match read_field_data(field).await {
                    Ok(data) => {
                        debug!("Audio data received: {} bytes", data.len());
                        file_bytes = Some(data);
                    }
                    Err(e) => {
                        error!("Failed to read audio data: {e}");
                        return HttpResponse::BadRequest().json(serde_json::json!({
                            "detail": "Failed to read audio data"
                        }));
                    }
                }
            }
            Some("conversation_mode") => {
                if let Ok(field_data) = read_field_data(field).await {
                    if let Ok(text) = String::from_utf8(field_data) {
                        conversation_mode = parse_bool_field(&text);
                        debug!("Conversation mode set to: {conversation_mode}");
                    }
                }
            }
            _ => continue,
        }
    }

    let bytes = match file_bytes {
        Some(data) if !data.is_empty() => data,
        _ => {
            warn!("No audio file provided in transcription request");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "detail": "No audio file provided"
            }));
        }
    };

    let upload = UploadedAudio {
        filename,
        bytes,
        conversation_mode,
    };

    match pipeline::run(&data.openai, upload).await {
        Ok(outcome) => HttpResponse::Ok().json(TranscriptDto {
            transcript: outcome.transcript,
            cost: outcome.cost,
        }),
        Err(e) => {
            let detail = if e.is_remote() {
                error!("OpenAI API Error: {e}");
                format!("OpenAI API Error: {e}")
            } else {
                error!("An unexpected error occurred: {e}");
                format!("An unexpected error occurred: {e}")
            };
            HttpResponse::InternalServerError().json(serde_json::json!({ "detail": detail }))
        }
    }
}

async fn read_field_data(mut field: Field) -> Result<Vec<u8>, actix_web::Error> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        data.extend_from_slice(&chunk);
    }
    debug!("Read field data: {} bytes", data.len());
    Ok(data)
}

fn parse_bool_field(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

pub async fn run_server(config: AppConfig, host: String, port: u16) -> std::io::Result<()> {
    log::info!("Starting transcription relay service");

    let app_state = web::Data::new(AppState {
        openai: OpenAiClient::new(&config),
    });

    log::info!("Starting HTTP server on {host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(
                actix_multipart::form::MultipartFormConfig::default()
                    .total_limit(512 * 1024 * 1024), // 512MB
            )
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(ping)
            .service(transcribe)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_field_accepts_form_style_values() {
        assert!(parse_bool_field("true"));
        assert!(parse_bool_field("True"));
        assert!(parse_bool_field("1"));
        assert!(parse_bool_field(" on "));
        assert!(!parse_bool_field("false"));
        assert!(!parse_bool_field("0"));
        assert!(!parse_bool_field(""));
    }
}
