use std::time::Duration;

pub const DEFAULT_API_KEY_VAR: &str = "DEEPGRAM_API_KEY";

/// Supplies the provider API key. Consulted once per request, never cached.
pub trait ApiKeySource: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from a process environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvApiKey {
    var: String,
}

impl EnvApiKey {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl ApiKeySource for EnvApiKey {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub provider_url: String,
    pub api_key_var: String,
    pub timeout: Duration,
}

#[derive(Debug)]
pub struct ClientConfig {
    pub server_url: String,
    pub audio_file: String,
    pub language: Option<String>,
}

impl ClientConfig {
    pub fn new(server_url: String, audio_file: String, language: Option<String>) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            audio_file,
            language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test that mutates the process environment, and the variable
    // it uses is read nowhere else.
    #[test]
    fn env_key_is_read_on_every_call() {
        let source = EnvApiKey::new("TRANSCRIBE_FORWARDER_TEST_KEY");
        assert_eq!(source.api_key(), None);

        unsafe { std::env::set_var(source.var(), "") };
        assert_eq!(source.api_key(), None, "empty key counts as missing");

        unsafe { std::env::set_var(source.var(), "first") };
        assert_eq!(source.api_key().as_deref(), Some("first"));

        unsafe { std::env::set_var(source.var(), "second") };
        assert_eq!(source.api_key().as_deref(), Some("second"));

        unsafe { std::env::remove_var(source.var()) };
        assert_eq!(source.api_key(), None);
    }

    #[test]
    fn client_config_strips_trailing_slash() {
        let config = ClientConfig::new(
            "http://localhost:8080/".to_string(),
            "clip.wav".to_string(),
            None,
        );
        assert_eq!(config.server_url, "http://localhost:8080");
    }
}
