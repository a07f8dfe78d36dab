use std::time::Duration;

use log::{debug, error, info};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use crate::error::TranscribeError;
use crate::language::ProviderQuery;

const LISTEN_PATH: &str = "/v1/listen";

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    pub transcript: String,
    pub confidence: f64,
    pub duration: f64,
}

// Only the fields read by `extract_result`; everything is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ListenResponse {
    #[serde(default)]
    pub results: Option<ListenResults>,
    #[serde(default)]
    pub metadata: Option<ListenMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListenResults {
    #[serde(default)]
    pub channels: Option<Vec<Channel>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub alternatives: Option<Vec<Alternative>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Alternative {
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListenMetadata {
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Reads the first channel's first alternative and the metadata duration.
///
/// Missing pieces fall back to `""` for the transcript and `0.0` for
/// confidence and duration; they are never an error.
pub fn extract_result(response: &ListenResponse) -> TranscriptionResult {
    let best = response
        .results
        .as_ref()
        .and_then(|results| results.channels.as_deref())
        .and_then(|channels| channels.first())
        .and_then(|channel| channel.alternatives.as_deref())
        .and_then(|alternatives| alternatives.first());

    TranscriptionResult {
        transcript: best
            .and_then(|alt| alt.transcript.clone())
            .unwrap_or_default(),
        confidence: best.and_then(|alt| alt.confidence).unwrap_or(0.0),
        duration: response
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.duration)
            .unwrap_or(0.0),
    }
}

pub struct DeepgramClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl DeepgramClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn listen_url(&self, query: &ProviderQuery) -> Result<reqwest::Url, TranscribeError> {
        reqwest::Url::parse_with_params(&format!("{}{LISTEN_PATH}", self.base_url), query.params())
            .map_err(|e| TranscribeError::unknown(format!("invalid provider URL: {e}")))
    }

    /// Sends the audio in a single attempt and decodes the result.
    pub async fn transcribe(
        &self,
        api_key: &str,
        query: &ProviderQuery,
        content_type: &str,
        audio: Vec<u8>,
    ) -> Result<TranscriptionResult, TranscribeError> {
        let url = self.listen_url(query)?;
        info!("Requesting provider URL: {url}");

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("Token {api_key}"))
            .header(CONTENT_TYPE, content_type)
            .body(audio)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        info!("Provider responded with status {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Provider error (status {}): {body}", status.as_u16());
            return Err(TranscribeError::ProviderStatus {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let decoded: ListenResponse = serde_json::from_slice(&bytes).map_err(|e| {
            TranscribeError::unknown(format!("failed to parse provider response: {e}"))
        })?;
        debug!("Provider response decoded: {} bytes", bytes.len());

        Ok(extract_result(&decoded))
    }

    fn map_send_error(&self, err: reqwest::Error) -> TranscribeError {
        if err.is_timeout() {
            TranscribeError::ProviderTimeout {
                secs: self.timeout.as_secs_f64().ceil() as u64,
            }
        } else {
            TranscribeError::unknown(err.to_string())
        }
    }
}
