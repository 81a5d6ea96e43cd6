mod auth;
mod client;

pub use client::SheetsClient;

// Re-export clear_tokens for CLI usage
pub use auth::clear_tokens as clear_sheets_tokens;
pub use auth::token_cache_path;

use crate::error::Result;
use crate::grid::Grid;
use async_trait::async_trait;

/// How the OAuth flow may obtain a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Interactive copy/paste code flow permitted. Used by `auth`.
    Bootstrap,
    /// Cached tokens only; a scheduled run must never block on stdin.
    Unattended,
}

#[async_trait]
pub trait RangeWriter {
    async fn write_range(&self, spreadsheet_id: &str, range: &str, grid: Grid) -> Result<()>;
}
