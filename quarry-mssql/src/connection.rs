//! SQL Server connection wrapper.

use tiberius::Client;
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};

use crate::config::MssqlConfig;
use crate::error::{MssqlError, MssqlResult};

/// A wrapper around a SQL Server connection.
pub struct MssqlConnection {
    client: Client<Compat<TcpStream>>,
}

impl MssqlConnection {
    /// Wrap an already-established client.
    pub fn new(client: Client<Compat<TcpStream>>) -> Self {
        Self { client }
    }

    /// Open a connection to the configured server.
    ///
    /// The configured connect timeout bounds the TCP connect and the
    /// TDS handshake together.
    pub async fn connect(config: &MssqlConfig) -> MssqlResult<Self> {
        let tiberius_config = config.to_tiberius_config()?;
        let addr = tiberius_config.get_addr();

        let handshake = async {
            let tcp = TcpStream::connect(&addr).await?;
            tcp.set_nodelay(true)?;
            let client = Client::connect(tiberius_config, tcp.compat_write()).await?;
            Ok::<_, MssqlError>(client)
        };

        let client = tokio::time::timeout(config.connect_timeout, handshake)
            .await
            .map_err(|_| {
                MssqlError::connection(format!(
                    "connect timed out after {:?}",
                    config.connect_timeout
                ))
            })??;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "sql server connection opened"
        );

        Ok(Self { client })
    }

    /// Check that the server still responds.
    pub async fn ping(&mut self) -> MssqlResult<()> {
        debug!("pinging sql server");
        self.client
            .simple_query("SELECT 1")
            .await?
            .into_results()
            .await?;
        Ok(())
    }

    /// Close the connection gracefully.
    pub async fn disconnect(self) -> MssqlResult<()> {
        info!("closing sql server connection");
        self.client.close().await?;
        Ok(())
    }

    /// Get the underlying client reference.
    pub fn inner(&self) -> &Client<Compat<TcpStream>> {
        &self.client
    }

    /// Get the underlying client mutably.
    pub fn inner_mut(&mut self) -> &mut Client<Compat<TcpStream>> {
        &mut self.client
    }

    /// Consume the wrapper, returning the underlying client.
    pub fn into_inner(self) -> Client<Compat<TcpStream>> {
        self.client
    }
}

#[cfg(test)]
mod tests {
    // Connection tests require integration testing with a real SQL Server;
    // configuration and SQL generation are covered in the sibling modules.
}
