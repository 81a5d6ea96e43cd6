mod client;
pub use client::Database;

use crate::error::Result;
use async_trait::async_trait;

/// Raw result of one query: column names plus text-rendered rows, with NULL
/// preserved as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[async_trait]
pub trait DbOperations {
    async fn run_query(&self, sql: &str) -> Result<QueryOutput>;
}
