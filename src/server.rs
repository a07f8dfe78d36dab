use std::sync::Arc;

use actix_cors::Cors;
use actix_multipart::{Field, Multipart};
use actix_web::{
    App, HttpResponse, HttpServer, Responder, get, http::header, middleware::Logger, post, web,
};
use futures_util::TryStreamExt;
use log::{debug, info, warn};

use crate::config::{ApiKeySource, EnvApiKey, ServerConfig};
use crate::dto::ResponseEnvelope;
use crate::error::TranscribeError;
use crate::language::ProviderQuery;
use crate::provider::DeepgramClient;

const DEFAULT_AUDIO_MIME: &str = "application/octet-stream";
const PREVIEW_CHARS: usize = 70;
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024; // 100MB

pub struct AppState {
    pub api_key: Arc<dyn ApiKeySource>,
    pub provider: DeepgramClient,
    pub max_upload_bytes: usize,
}

struct AudioUpload {
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

#[get("/api/health")]
pub async fn health_check() -> impl Responder {
    debug!("Health check endpoint called");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "transcription forwarder is running"
    }))
}

#[post("/api/transcribe")]
pub async fn transcribe_upload(
    data: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, TranscribeError> {
    info!("Transcription request received");

    let Some(api_key) = data.api_key.api_key() else {
        return Err(TranscribeError::MissingApiKey);
    };
    debug!("API key loaded");

    let mut audio: Option<AudioUpload> = None;
    let mut language: Option<String> = None;
    let mut remaining = data.max_upload_bytes;

    while let Some(field) = payload.try_next().await.map_err(form_error)? {
        match field.name() {
            Some("audio") if audio.is_some() => {
                debug!("Ignoring additional 'audio' part");
                continue;
            }
            Some("audio") => {
                let Some(filename) = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string)
                else {
                    warn!("Field 'audio' is not a file, ignoring it");
                    continue;
                };
                let content_type = field
                    .headers()
                    .get(header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
                    .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string());
                let bytes = read_field_data(field, &mut remaining, data.max_upload_bytes).await?;
                audio = Some(AudioUpload {
                    filename,
                    content_type,
                    data: bytes,
                });
            }
            Some("language") => {
                let bytes = read_field_data(field, &mut remaining, data.max_upload_bytes).await?;
                language = Some(String::from_utf8_lossy(&bytes).into_owned());
            }
            _ => continue,
        }
    }

    let Some(audio) = audio else {
        warn!("No audio file provided in transcription request");
        return Err(TranscribeError::MissingAudio);
    };

    info!(
        "Received file: {} ({} bytes, {})",
        audio.filename,
        audio.data.len(),
        audio.content_type
    );
    info!("Language hint from caller: {language:?}");

    let query = ProviderQuery::for_hint(language.as_deref());
    info!("Resolved provider language: {}", query.language);

    let result = data
        .provider
        .transcribe(&api_key, &query, &audio.content_type, audio.data)
        .await?;

    let preview: String = result.transcript.chars().take(PREVIEW_CHARS).collect();
    info!("Transcript preview: \"{preview}...\"");

    Ok(HttpResponse::Ok().json(ResponseEnvelope::success(result)))
}

fn form_error(err: actix_multipart::MultipartError) -> TranscribeError {
    TranscribeError::unknown(format!("failed to parse form data: {err}"))
}

/// Reads a whole part, charging its size against the request's `remaining` budget.
async fn read_field_data(
    mut field: Field,
    remaining: &mut usize,
    limit: usize,
) -> Result<Vec<u8>, TranscribeError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(form_error)? {
        if chunk.len() > *remaining {
            warn!("Upload exceeds the {limit} byte limit");
            return Err(TranscribeError::UploadTooLarge { limit });
        }
        *remaining -= chunk.len();
        data.extend_from_slice(&chunk);
    }
    debug!("Read field data: {} bytes", data.len());
    Ok(data)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(transcribe_upload);
}

pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    info!("Starting transcription forwarder");

    let key_source = EnvApiKey::new(config.api_key_var);
    info!(
        "Using configuration: provider_url={}, api_key_var={}, timeout={:?}",
        config.provider_url,
        key_source.var(),
        config.timeout
    );

    let provider = DeepgramClient::new(&config.provider_url, config.timeout)
        .map_err(|e| std::io::Error::other(format!("failed to build HTTP client: {e}")))?;

    let app_state = web::Data::new(AppState {
        api_key: Arc::new(key_source),
        provider,
        max_upload_bytes: MAX_UPLOAD_BYTES,
    });

    info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
