use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use log::error;

use crate::dto::ResponseEnvelope;

pub const UNKNOWN_ERROR: &str = "unknown internal error";

#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("server configuration error, missing API key")]
    MissingApiKey,

    #[error("no audio file received")]
    MissingAudio,

    #[error("audio file exceeds the {limit} byte upload limit")]
    UploadTooLarge { limit: usize },

    #[error("transcription service failed, status code: {status}")]
    ProviderStatus { status: u16 },

    #[error("transcription service timed out after {secs}s")]
    ProviderTimeout { secs: u64 },

    #[error("{0}")]
    Unknown(String),
}

impl TranscribeError {
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self::Unknown(UNKNOWN_ERROR.to_string())
        } else {
            Self::Unknown(message)
        }
    }
}

impl ResponseError for TranscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAudio | Self::UploadTooLarge { .. } => StatusCode::BAD_REQUEST,
            Self::MissingApiKey
            | Self::ProviderStatus { .. }
            | Self::ProviderTimeout { .. }
            | Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Transcription request failed ({status}): {self}");
        }
        HttpResponse::build(status).json(ResponseEnvelope::failure(self.to_string()))
    }
}
