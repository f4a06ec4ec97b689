use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::{ConnectionConfig, DriverKind};
use crate::error::{ConnectError, Result};
use crate::traits::{Connection, DatabaseDriver};

/// Main entry point for dbconn.
/// Holds a configuration and the driver used to open sessions from it.
/// Every call to [`ConnectionProvider::get_connection`] opens a fresh session;
/// nothing is pooled or reused.
pub struct ConnectionProvider {
    config: ConnectionConfig,
    driver: Arc<dyn DatabaseDriver>,
}

impl ConnectionProvider {
    /// Create a provider backed by the driver named in the configuration.
    ///
    /// # Example
    /// ```ignore
    /// let config = ConnectionConfig::new(DriverKind::MySql, "db.local", "app", "reader");
    /// let provider = ConnectionProvider::new(config)?;
    /// let conn = provider.get_connection().await?;
    /// ```
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let driver = driver_for(config.driver)?;
        Ok(Self { config, driver })
    }

    /// Create a provider with a custom driver.
    /// Useful for testing or using alternative database drivers.
    pub fn with_driver(config: ConnectionConfig, driver: Arc<dyn DatabaseDriver>) -> Self {
        Self { config, driver }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Open a new connection. The caller owns the handle and closes it.
    /// Failures are logged once here and returned; there is no retry.
    pub async fn get_connection(&self) -> Result<Box<dyn Connection>> {
        self.connect().await.map_err(|e| {
            warn!(
                driver = %self.config.driver,
                endpoint = %self.config.endpoint(),
                user = %self.config.user,
                kind = ?e.kind(),
                error = %e,
                "connection attempt failed"
            );
            e
        })
    }

    /// Open a connection, logging and swallowing any failure.
    /// Callers that need to tell failure kinds apart use
    /// [`ConnectionProvider::get_connection`] instead.
    pub async fn get_connection_or_none(&self) -> Option<Box<dyn Connection>> {
        match self.connect().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!(
                    driver = %self.config.driver,
                    endpoint = %self.config.endpoint(),
                    user = %self.config.user,
                    kind = ?e.kind(),
                    error = %e,
                    "no connection available"
                );
                None
            }
        }
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        self.config.validate()?;

        let endpoint = self.config.endpoint();
        debug!(driver = %self.driver.kind(), endpoint = %endpoint, "opening connection");

        let conn = self.driver.connect(&self.config).await?;
        debug!(endpoint = %endpoint, id = conn.id(), "connection established");
        Ok(conn)
    }
}

/// Resolve the compiled-in driver for a kind.
pub fn driver_for(kind: DriverKind) -> Result<Arc<dyn DatabaseDriver>> {
    match kind {
        #[cfg(feature = "mysql")]
        DriverKind::MySql => Ok(Arc::new(crate::drivers::MySqlDriver::new())),

        #[cfg(feature = "postgres")]
        DriverKind::Postgres => Ok(Arc::new(crate::drivers::TokioPostgresDriver::new())),

        // Fallback for when feature not compiled
        #[allow(unreachable_patterns)]
        other => Err(ConnectError::DriverUnavailable(format!(
            "{} (feature not compiled)",
            other
        ))),
    }
}
