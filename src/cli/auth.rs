use crate::config::Config;
use crate::error::Result;
use crate::sheets::{AuthMode, SheetsClient, clear_sheets_tokens};
use tracing::info;

pub async fn execute(reset: bool) -> Result<()> {
    if reset {
        clear_sheets_tokens()?;
    }

    let config = Config::load()?;
    let _client = SheetsClient::new(&config.google, AuthMode::Bootstrap).await?;

    info!("Google Sheets authentication verified");

    Ok(())
}
