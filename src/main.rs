mod cli;
mod client;
mod config;
mod dto;
mod error;
mod language;
mod provider;
mod server;

use std::time::Duration;

use clap::Parser;
use cli::{Cli, Commands};
use config::{ClientConfig, ServerConfig};
use log::error;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            provider_url,
            api_key_var,
            timeout_secs,
        } => {
            let config = ServerConfig {
                host,
                port,
                provider_url,
                api_key_var,
                timeout: Duration::from_secs(timeout_secs),
            };
            if let Err(e) = server::run_server(config).await {
                error!("Server error: {e}");
                return Err(e.into());
            }
        }
        Commands::TranscribeFile {
            audio_file,
            language,
            server_url,
        } => {
            let config = ClientConfig::new(server_url, audio_file, language);
            client::run_client(config).await?;
        }
    }

    Ok(())
}
