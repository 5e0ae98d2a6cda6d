//! MySQL connection creation.
//!
//! Statement execution belongs to the layer above; this wrapper only
//! opens, checks, and closes connections.

use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts};
use tracing::{debug, info};

use crate::config::MysqlConfig;
use crate::error::{MysqlError, MysqlResult};

/// A wrapper around one open MySQL connection.
pub struct MysqlConnection {
    conn: Conn,
}

impl MysqlConnection {
    /// Wrap an already-open connection.
    pub fn new(conn: Conn) -> Self {
        Self { conn }
    }

    /// Open a connection described by `config`.
    ///
    /// `config.connect_timeout` bounds the whole handshake.
    pub async fn connect(config: &MysqlConfig) -> MysqlResult<Self> {
        let opts = Opts::from(config.to_opts_builder());
        let handshake = Conn::new(opts);

        let conn = match config.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, handshake)
                .await
                .map_err(|_| {
                    MysqlError::connection(format!("connect timed out after {limit:?}"))
                })??,
            None => handshake.await?,
        };

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "mysql connection opened"
        );
        Ok(Self { conn })
    }

    /// Check the connection is still alive.
    pub async fn ping(&mut self) -> MysqlResult<()> {
        debug!("pinging mysql server");
        self.conn.ping().await?;
        Ok(())
    }

    /// Close the connection cleanly.
    pub async fn disconnect(self) -> MysqlResult<()> {
        self.conn.disconnect().await?;
        info!("mysql connection closed");
        Ok(())
    }

    /// Get the inner connection.
    pub fn inner(&self) -> &Conn {
        &self.conn
    }

    /// Get the inner connection mutably.
    pub fn inner_mut(&mut self) -> &mut Conn {
        &mut self.conn
    }

    /// Consume and return the inner connection.
    pub fn into_inner(self) -> Conn {
        self.conn
    }
}
