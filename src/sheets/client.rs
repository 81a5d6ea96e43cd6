use super::{AuthMode, RangeWriter};
use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use crate::grid::Grid;
use crate::sheets::auth::create_and_verify_authenticator;
use async_trait::async_trait;
use google_sheets4::api::{BatchUpdateValuesRequest, Scope, Sheets, ValueRange};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use std::time::Duration;
use tracing::{debug, instrument};

// Read/write access to spreadsheet cells.
pub(crate) const AUTH_SCOPE: Scope = Scope::Spreadsheet;

const WRITE_TIMEOUT: Duration = Duration::from_secs(120);

pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
}

impl SheetsClient {
    /// Create a new SheetsClient with authenticated access
    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    pub async fn new(config: &GoogleConfig, mode: AuthMode) -> Result<Self> {
        let auth = create_and_verify_authenticator(config, mode).await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .unwrap()
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        Ok(Self {
            hub: Sheets::new(client, auth),
        })
    }
}

/// One range/grid pair, values taken with the standard user-entry semantics.
fn batch_update_request(range: &str, grid: Grid) -> BatchUpdateValuesRequest {
    BatchUpdateValuesRequest {
        value_input_option: Some("USER_ENTERED".to_string()),
        data: Some(vec![ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: Some(range.to_string()),
            values: Some(grid),
        }]),
        ..Default::default()
    }
}

#[async_trait]
impl RangeWriter for SheetsClient {
    /// Replace the named range with the grid in a single batch-update call.
    #[instrument(name = "Writing range", skip(self, grid))]
    async fn write_range(&self, spreadsheet_id: &str, range: &str, grid: Grid) -> Result<()> {
        let rows = grid.len();
        let request = batch_update_request(range, grid);

        let (_, response) = tokio::time::timeout(
            WRITE_TIMEOUT,
            self.hub
                .spreadsheets()
                .values_batch_update(request, spreadsheet_id)
                .add_scope(AUTH_SCOPE)
                .doit(),
        )
        .await
        .map_err(|_| AppError::Sheets(format!("Write timed out after {:?}", WRITE_TIMEOUT)))?
        .map_err(|e| AppError::Sheets(format!("Failed to write range '{}': {}", range, e)))?;

        debug!(rows, updated = ?response.total_updated_cells, "Range replaced");

        Ok(())
    }
}
