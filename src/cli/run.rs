use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::runner::LoaderRunner;
use crate::sheets::{AuthMode, SheetsClient};
use anyhow::anyhow;
use std::collections::BTreeMap;
use tracing::info;

pub async fn execute(only: Option<&str>) -> Result<()> {
    let config = Config::load()?;

    let mut loaders = config.loaders;
    if let Some(name) = only {
        let loader = loaders
            .remove(name)
            .ok_or_else(|| AppError::Config(format!("no loader named '{}' in config", name)))?;
        loaders = BTreeMap::from([(name.to_string(), loader)]);
    }

    let sheets_client = SheetsClient::new(&config.google, AuthMode::Unattended).await?;
    let db = Database::new(config.database);

    let runner = LoaderRunner::new(loaders, db, sheets_client);
    let report = runner.run_all().await?;

    info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "Run complete"
    );

    if !report.failed.is_empty() {
        let total = report.failed.len() + report.succeeded.len();
        return Err(anyhow!("{} of {} loaders failed", report.failed.len(), total).into());
    }

    Ok(())
}
