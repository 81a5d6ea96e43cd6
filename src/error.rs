use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("OAuth2 authentication error: {0}")]
    Auth(String),

    #[error("Database connection error: {0}")]
    Db(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Row decode error: {0}")]
    Scan(String),

    #[error("Google Sheets API error: {0}")]
    Sheets(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Setup and bootstrap failures abort the whole batch; everything else
    /// is scoped to the loader that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Config(_) | AppError::Auth(_) | AppError::Db(_)
        )
    }
}

/// A per-loader failure, paired with the loader that raised it.
#[derive(Error, Debug)]
#[error("loader '{loader}' failed: {source}")]
pub struct LoaderError {
    pub loader: String,
    #[source]
    pub source: AppError,
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(AppError::Db("unreachable".to_string()).is_fatal());
        assert!(AppError::Auth("rejected".to_string()).is_fatal());
        assert!(!AppError::Query("syntax error".to_string()).is_fatal());
        assert!(!AppError::Sheets("bad range".to_string()).is_fatal());
    }

    #[test]
    fn test_loader_error_display() {
        let err = LoaderError {
            loader: "orders".to_string(),
            source: AppError::Query("relation does not exist".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "loader 'orders' failed: Query error: relation does not exist"
        );
    }
}
