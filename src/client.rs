use std::path::Path;

use anyhow::{Result, anyhow};

use crate::config::ClientConfig;
use crate::dto::ResponseEnvelope;
use crate::provider::TranscriptionResult;

pub fn mime_type_from_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("mp4") => "video/mp4",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("flac") => "audio/flac",
        Some("webm") => "audio/webm",
        Some("aac") => "audio/aac",
        _ => "application/octet-stream",
    }
}

pub async fn send_transcription_request(config: &ClientConfig) -> Result<TranscriptionResult> {
    let client = reqwest::Client::new();
    let path = Path::new(&config.audio_file);

    if !path.exists() {
        return Err(anyhow!("Audio file not found: {}", config.audio_file));
    }
    let audio_data = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow!("Failed to read audio file: {}", e))?;

    let mime = mime_type_from_extension(path);
    println!(
        "📁 Audio source: {} ({} bytes, {})",
        config.audio_file,
        audio_data.len(),
        mime
    );

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("audio")
        .to_string();

    let part = reqwest::multipart::Part::bytes(audio_data)
        .file_name(filename)
        .mime_str(mime)?;
    let mut form = reqwest::multipart::Form::new().part("audio", part);
    if let Some(language) = &config.language {
        form = form.text("language", language.clone());
    }

    println!(
        "🚀 Sending transcription request to: {}/api/transcribe",
        config.server_url
    );
    println!(
        "   Language hint: {}",
        config.language.as_deref().unwrap_or("(none)")
    );

    let response = client
        .post(format!("{}/api/transcribe", config.server_url))
        .multipart(form)
        .send()
        .await
        .map_err(|e| anyhow!("Failed to send request: {}", e))?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read response: {}", e))?;

    let envelope: ResponseEnvelope = serde_json::from_str(&response_text).map_err(|e| {
        anyhow!(
            "Server returned {} with an unexpected body ({}): {}",
            status,
            e,
            response_text
        )
    })?;

    match envelope {
        ResponseEnvelope::Success {
            transcript,
            confidence,
            duration,
            ..
        } => Ok(TranscriptionResult {
            transcript,
            confidence,
            duration,
        }),
        ResponseEnvelope::Failure { error, .. } => {
            Err(anyhow!("Server returned error {}: {}", status, error))
        }
    }
}

pub async fn check_server_health(server_url: &str) -> Result<()> {
    let client = reqwest::Client::new();

    println!("🔍 Checking server health at: {server_url}/api/health");

    let response = client
        .get(format!("{server_url}/api/health"))
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
    println!("🎵 Transcribe Forwarder Client");
    println!("==============================");
    println!("📁 File Mode: {}", config.audio_file);
    println!();

    if let Err(e) = check_server_health(&config.server_url).await {
        eprintln!("❌ {e}");
        eprintln!("💡 Make sure the server is running: transcribe-forwarder serve");
        return Err(e);
    }

    match send_transcription_request(&config).await {
        Ok(result) => {
            println!("\n✅ Transcription completed!");
            println!("📝 Transcript: {}", result.transcript);
            println!(
                "   Confidence: {:.2}, Duration: {:.2}s",
                result.confidence, result.duration
            );
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
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn temp_audio(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
        std::fs::write(&path, b"fake audio bytes").unwrap();
        path
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_type_from_extension(Path::new("a.wav")), "audio/wav");
        assert_eq!(mime_type_from_extension(Path::new("a.WEBM")), "audio/webm");
        assert_eq!(mime_type_from_extension(Path::new("a.mp3")), "audio/mpeg");
        assert_eq!(
            mime_type_from_extension(Path::new("noext")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn decodes_success_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/transcribe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "transcript": "hello there",
                "confidence": 0.9,
                "duration": 1.5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let file = temp_audio("success.wav");
        let config = ClientConfig::new(
            server.uri(),
            file.to_string_lossy().into_owned(),
            Some("en".to_string()),
        );
        let result = send_transcription_request(&config).await.unwrap();
        std::fs::remove_file(&file).ok();

        assert_eq!(
            result,
            TranscriptionResult {
                transcript: "hello there".to_string(),
                confidence: 0.9,
                duration: 1.5,
            }
        );
    }

    #[tokio::test]
    async fn failure_envelope_becomes_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/transcribe"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "error": "no audio file received"
            })))
            .mount(&server)
            .await;

        let file = temp_audio("failure.wav");
        let config = ClientConfig::new(server.uri(), file.to_string_lossy().into_owned(), None);
        let err = send_transcription_request(&config).await.unwrap_err();
        std::fs::remove_file(&file).ok();

        let message = err.to_string();
        assert!(message.contains("400"), "{message}");
        assert!(message.contains("no audio file received"), "{message}");
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let config = ClientConfig::new(
            "http://localhost:1".to_string(),
            "/definitely/not/here.wav".to_string(),
            None,
        );
        let err = send_transcription_request(&config).await.unwrap_err();
        assert!(err.to_string().contains("Audio file not found"));
    }
}
