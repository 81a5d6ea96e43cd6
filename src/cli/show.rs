use crate::config::Config;
use crate::error::Result;
use crate::sheets;
use clap::Subcommand;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ShowResource {
    /// Show configuration and credential cache paths
    Paths,
}

impl ShowResource {
    pub async fn execute(&self) -> Result<()> {
        match self {
            ShowResource::Paths => show_paths(),
        }
    }
}

fn show_paths() -> Result<()> {
    let config_path = Config::config_file()?;
    let token_path = sheets::token_cache_path()?;

    info!(path = ?config_path, "Config file");
    info!(path = ?token_path, exists = token_path.exists(), "Google token cache");

    // The secret file location is only known once the config parses
    if let Ok(config) = Config::load() {
        info!(path = ?config.google.client_secret_file, "Client secret file");
    }

    Ok(())
}
