use clap::{Parser, Subcommand};

use crate::config::DEFAULT_API_KEY_VAR;

#[derive(Parser)]
#[command(
    name = "transcribe-forwarder",
    about = "Transcribe Forwarder - relays uploaded audio to Deepgram",
    long_about = "An HTTP service that accepts an uploaded audio file and a language hint, forwards it to the Deepgram speech-to-text API and returns the transcript as JSON.",
    after_help = "EXAMPLES:\n    # Start the forwarder (reads DEEPGRAM_API_KEY on every request)\n    transcribe-forwarder serve\n\n    # Send a file to a running forwarder\n    transcribe-forwarder file my_audio.wav\n\n    # Transcribe Mandarin audio\n    transcribe-forwarder file nihao.webm --language zh\n\n    # Use a different server\n    transcribe-forwarder file audio.wav --server-url http://my-server:8080"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(name = "serve")]
    Serve {
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, env = "PORT", default_value = "8080")]
        port: u16,

        /// Base URL of the speech-to-text provider
        #[arg(long, env = "DEEPGRAM_API_URL", default_value = "https://api.deepgram.com")]
        provider_url: String,

        /// Environment variable the API key is read from on every request
        #[arg(long, default_value = DEFAULT_API_KEY_VAR)]
        api_key_var: String,

        #[arg(long, env = "TRANSCRIBE_TIMEOUT_SECS", default_value = "60", value_parser = validate_timeout)]
        timeout_secs: u64,
    },
    #[command(name = "file")]
    TranscribeFile {
        audio_file: String,

        /// Language hint; "zh" selects Mandarin, anything else English
        #[arg(long, short = 'l')]
        language: Option<String>,

        #[arg(long, default_value = "http://localhost:8080")]
        server_url: String,
    },
}

pub fn validate_timeout(s: &str) -> Result<u64, String> {
    match s.parse::<u64>() {
        Ok(0) => Err("Timeout must be at least 1 second".to_string()),
        Ok(secs) => Ok(secs),
        Err(_) => Err("Invalid timeout value".to_string()),
    }
}
