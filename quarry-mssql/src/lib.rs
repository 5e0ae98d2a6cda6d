//! SQL Server dialect provider for the Quarry data access layer.
//!
//! This crate supplies the SQL Server side of SQL generation:
//! identifier quoting with brackets, `@P1`-style positional
//! placeholders, and `ROW_NUMBER()`-windowed pagination, plus
//! connection configuration and creation over `tiberius`.
//!
//! # Features
//!
//! - [`MssqlDialect`] implementing `quarry_query::SqlDialect`
//! - `mssql://` URL and ADO.NET connection string parsing
//! - Async connection creation via `tiberius` on a `tokio` TCP stream
//! - Filter-value to parameter conversions
//!
//! # Example
//!
//! ```rust
//! use quarry_mssql::MssqlDialect;
//! use quarry_query::sql::SqlDialect;
//!
//! let dialect = MssqlDialect::new();
//! let sql = dialect
//!     .build_pagination_sql(0, 10, "SELECT * FROM t", "ORDER BY [id]", None)
//!     .unwrap();
//! assert!(sql.contains("ROW_NUMBER() OVER (ORDER BY [id])"));
//! assert!(sql.ends_with("BETWEEN 1 AND 10"));
//! ```
//!
//! Opening a connection:
//!
//! ```rust,ignore
//! use quarry_mssql::{MssqlConfig, MssqlConnection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MssqlConfig::from_connection_string(
//!         "Server=localhost;Database=mydb;User Id=sa;Password=Password123!;",
//!     )?;
//!     let mut conn = MssqlConnection::connect(&config).await?;
//!     conn.ping().await?;
//!     conn.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod types;

pub use config::{EncryptionMode, MssqlConfig};
pub use connection::MssqlConnection;
pub use dialect::MssqlDialect;
pub use error::{MssqlError, MssqlResult};
pub use types::{value_to_sql, values_to_sql};
