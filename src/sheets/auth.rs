use crate::config::{Config, GoogleConfig};
use crate::error::{AppError, Result};
use crate::sheets::AuthMode;
use crate::sheets::client::AUTH_SCOPE;
use hyper_util::client::legacy::connect::HttpConnector;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing::instrument;
use yup_oauth2::{
    InstalledFlowAuthenticator, InstalledFlowReturnMethod, authenticator::Authenticator,
    hyper_rustls::HttpsConnector, read_application_secret,
};

type AuthType = Authenticator<HttpsConnector<HttpConnector>>;

/// Create and verify authenticator by fetching a token.
///
/// In unattended mode the token comes from the on-disk cache (refreshed
/// silently when expired); in bootstrap mode the interactive consent flow
/// runs if the cache cannot produce one.
pub(super) async fn create_and_verify_authenticator(
    config: &GoogleConfig,
    mode: AuthMode,
) -> Result<AuthType> {
    let auth = from_installed_flow(config, mode).await?;

    // Trigger authentication by requesting a token
    let _token = auth
        .token(&[AUTH_SCOPE])
        .await
        .map_err(|e| AppError::Auth(format!("Failed to get token: {}", e)))?;

    Ok(auth)
}

async fn from_installed_flow(config: &GoogleConfig, mode: AuthMode) -> Result<AuthType> {
    // Provider-issued client id/secret/redirect bundle, read once
    let secret = read_application_secret(&config.client_secret_file)
        .await
        .map_err(|e| {
            AppError::Auth(format!(
                "Failed to read client secret file {:?}: {}",
                config.client_secret_file, e
            ))
        })?;

    let token_cache_path = token_cache_path()?;
    let cache_usable = cache_is_valid(&token_cache_path);

    if mode == AuthMode::Unattended && !cache_usable {
        return Err(AppError::Auth(
            "no cached Google credentials; run 'sheet-loader auth' first".to_string(),
        ));
    }

    // An unparsable cache is equivalent to a missing one; discard it so the
    // consent flow can run instead of erroring on the stale file.
    if token_cache_path.exists() && !cache_usable {
        fs::remove_file(&token_cache_path)
            .map_err(|e| AppError::Auth(format!("Failed to discard token cache: {}", e)))?;
        debug!("Discarded unparsable token cache");
    }

    // Create parent directory if it doesn't exist
    if let Some(parent) = token_cache_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Auth(format!("Failed to create token cache directory: {}", e))
        })?;
    }

    // Build the authenticator with installed flow (interactive mode)
    // User will copy/paste the authorization code from the browser
    let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::Interactive)
        .persist_tokens_to_disk(token_cache_path)
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))?;

    Ok(auth)
}

/// Clear cached Google tokens by deleting the token cache file
#[instrument(name = "Clearing auth tokens for Google Sheets", skip_all)]
pub fn clear_tokens() -> Result<()> {
    let token_path = token_cache_path()?;

    if !token_path.exists() {
        debug!("No Google Sheets tokens to clear");
        return Ok(());
    }

    fs::remove_file(&token_path)
        .map_err(|e| AppError::Auth(format!("Failed to delete tokens file: {}", e)))?;
    debug!("Cleared Google Sheets cached tokens");

    Ok(())
}

/// The disk store is a JSON array of tokens; a file holding anything else
/// cannot yield a credential and counts as no cache at all.
fn cache_is_valid(path: &Path) -> bool {
    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str::<serde_json::Value>(&contents)
            .map(|v| v.is_array())
            .unwrap_or(false),
        Err(_) => false,
    }
}

pub fn token_cache_path() -> Result<PathBuf> {
    Config::cache_file("google_tokens.json")
}
