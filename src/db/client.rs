use super::{DbOperations, QueryOutput};
use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio_postgres::{Config as ClientConfig, NoTls, SimpleQueryMessage};
use tracing::{debug, instrument, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Database {
    config: DatabaseConfig,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    async fn connect(&self) -> Result<tokio_postgres::Client> {
        let (client, conn) = ClientConfig::new()
            .host(&self.config.host)
            .port(self.config.port)
            .user(&self.config.user)
            .password(&self.config.password)
            .dbname(&self.config.dbname)
            .connect_timeout(CONNECT_TIMEOUT)
            .connect(NoTls)
            .await
            .map_err(|e| {
                AppError::Db(format!(
                    "Failed to connect to {}:{}: {}",
                    self.config.host, self.config.port, e
                ))
            })?;

        // The connection task finishes once the client is dropped.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                warn!("Database connection error: {}", e);
            }
        });

        debug!(host = %self.config.host, dbname = %self.config.dbname, "Connected to database");

        Ok(client)
    }
}

#[async_trait]
impl DbOperations for Database {
    /// Open a fresh connection, run the statement through the simple-query
    /// protocol, and collect its text-rendered rows. No pooling: each call
    /// gets its own connection and drops it on every exit path.
    #[instrument(name = "Running query", skip_all)]
    async fn run_query(&self, sql: &str) -> Result<QueryOutput> {
        let client = self.connect().await?;

        let timeout = Duration::from_secs(self.config.query_timeout_secs);
        let messages = tokio::time::timeout(timeout, client.simple_query(sql))
            .await
            .map_err(|_| AppError::Query(format!("Query timed out after {:?}", timeout)))?
            .map_err(|e| AppError::Query(format!("Failed to execute query: {}", e)))?;

        collect_output(messages)
    }
}

fn collect_output(messages: Vec<SimpleQueryMessage>) -> Result<QueryOutput> {
    let mut columns: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(description) => {
                if columns.is_some() {
                    return Err(AppError::Query(
                        "query produced more than one result set".to_string(),
                    ));
                }
                columns = Some(description.iter().map(|c| c.name().to_string()).collect());
            }
            SimpleQueryMessage::Row(row) => {
                if columns.is_none() {
                    return Err(AppError::Scan(
                        "row arrived before column description".to_string(),
                    ));
                }
                let mut cells = Vec::with_capacity(row.len());
                for i in 0..row.len() {
                    cells.push(row.get(i).map(str::to_string));
                }
                rows.push(cells);
            }
            SimpleQueryMessage::CommandComplete(_) => {}
            _ => {}
        }
    }

    let columns = columns.ok_or_else(|| {
        AppError::Query("statement did not return a result set".to_string())
    })?;

    Ok(QueryOutput { columns, rows })
}
