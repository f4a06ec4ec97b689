use async_trait::async_trait;

use crate::config::{ConnectionConfig, DriverKind};
use crate::error::Result;
use crate::traits::Connection;

/// Trait for database driver implementations.
/// Drivers are responsible for:
/// - Opening an authenticated session from a ConnectionConfig
/// - Translating native client errors into ConnectError kinds
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Open a new session. Every call yields an independent connection.
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>>;

    /// The protocol this driver speaks.
    fn kind(&self) -> DriverKind;
}
