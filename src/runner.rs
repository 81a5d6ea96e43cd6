use crate::config::LoaderConfig;
use crate::db::DbOperations;
use crate::error::{LoaderError, Result};
use crate::grid;
use crate::sheets::RangeWriter;
use std::collections::BTreeMap;
use tracing::{error, info, instrument};

/// Outcome of one batch: which loaders replaced their range, which failed.
#[derive(Debug, Default)]
pub struct RunReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<LoaderError>,
}

pub struct LoaderRunner<D, S> {
    loaders: BTreeMap<String, LoaderConfig>,
    db: D,
    sheets_client: S,
}

impl<D, S> LoaderRunner<D, S>
where
    D: DbOperations + Sync,
    S: RangeWriter + Sync,
{
    pub fn new(loaders: BTreeMap<String, LoaderConfig>, db: D, sheets_client: S) -> Self {
        Self {
            loaders,
            db,
            sheets_client,
        }
    }

    /// Run every configured loader, strictly sequentially, in name order.
    ///
    /// A fatal error aborts the batch; any other failure is recorded in the
    /// report and the next loader still runs.
    #[instrument(name = "Running loaders", skip_all)]
    pub async fn run_all(&self) -> Result<RunReport> {
        let mut report = RunReport::default();

        for (name, loader) in &self.loaders {
            info!(loader = %name, "Running loader");
            match self.run_loader(loader).await {
                Ok(()) => report.succeeded.push(name.clone()),
                Err(e) if e.is_fatal() => return Err(e),
                Err(source) => {
                    error!(loader = %name, error = %source, "Loader failed");
                    report.failed.push(LoaderError {
                        loader: name.clone(),
                        source,
                    });
                }
            }
        }

        Ok(report)
    }

    #[instrument(name = "Running loader", skip_all, fields(range = %loader.range))]
    async fn run_loader(&self, loader: &LoaderConfig) -> Result<()> {
        let output = self.db.run_query(&loader.query).await?;
        let grid = grid::build_grid(output)?;

        // Each loader writes to its own configured range.
        self.sheets_client
            .write_range(&loader.sheet, &loader.range, grid)
            .await?;

        info!("Loader complete");

        Ok(())
    }
}

#[cfg(test)]
mod mocks {
    use super::*;
    use crate::db::QueryOutput;
    use crate::error::AppError;
    use crate::grid::Grid;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Scripted query results keyed by SQL text; unknown statements are
    /// rejected, optionally as a connection-level failure.
    pub(crate) struct MockDb {
        pub outputs: HashMap<String, QueryOutput>,
        pub fail_connect: bool,
    }

    #[async_trait]
    impl DbOperations for MockDb {
        async fn run_query(&self, sql: &str) -> Result<QueryOutput> {
            if self.fail_connect {
                return Err(AppError::Db("connection refused".to_string()));
            }
            self.outputs
                .get(sql)
                .cloned()
                .ok_or_else(|| AppError::Query(format!("relation does not exist: {}", sql)))
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct MockSheetsClient {
        pub writes: Arc<Mutex<Vec<(String, String, Grid)>>>,
    }

    #[async_trait]
    impl RangeWriter for MockSheetsClient {
        async fn write_range(&self, spreadsheet_id: &str, range: &str, grid: Grid) -> Result<()> {
            self.writes.lock().unwrap().push((
                spreadsheet_id.to_string(),
                range.to_string(),
                grid,
            ));
            Ok(())
        }
    }
}
