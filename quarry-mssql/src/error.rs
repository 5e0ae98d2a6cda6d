//! Error types for the SQL Server provider.

use thiserror::Error;

/// Result type for SQL Server provider operations.
pub type MssqlResult<T> = Result<T, MssqlError>;

/// Errors raised while configuring or opening SQL Server connections.
///
/// SQL generation itself reports through
/// [`quarry_query::QueryError`]; these variants never cross into the
/// compiler path.
#[derive(Error, Debug)]
pub enum MssqlError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Socket I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Tiberius/SQL Server error.
    #[error("sql server error: {0}")]
    SqlServer(#[from] tiberius::error::Error),
}

impl MssqlError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}
