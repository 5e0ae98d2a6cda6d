//! Error types for the MySQL provider.

use thiserror::Error;

/// Result type for MySQL provider operations.
pub type MysqlResult<T> = Result<T, MysqlError>;

/// Errors raised while configuring or opening MySQL connections.
///
/// SQL generation itself reports through
/// [`quarry_query::QueryError`]; these variants never cross into the
/// compiler path.
#[derive(Error, Debug)]
pub enum MysqlError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// MySQL driver error.
    #[error("mysql error: {0}")]
    Mysql(#[from] mysql_async::Error),
}

impl MysqlError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MysqlError::config("invalid url");
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("invalid url"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(MysqlError::config("test"), MysqlError::Config(_)));
        assert!(matches!(
            MysqlError::connection("test"),
            MysqlError::Connection(_)
        ));
    }
}
