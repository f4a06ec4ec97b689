use async_trait::async_trait;

use crate::config::DriverKind;
use crate::error::Result;

/// An open session bound to one socket.
/// Owned by the caller; nothing else keeps a reference to it.
#[async_trait]
pub trait Connection: Send {
    /// Driver-assigned session id (server thread id or backend pid).
    fn id(&self) -> u64;

    fn driver(&self) -> DriverKind;

    fn server_version(&self) -> Option<String> {
        None
    }

    /// Round-trip to the server.
    async fn ping(&mut self) -> Result<()>;

    /// Disconnect from the server.
    async fn close(self: Box<Self>) -> Result<()>;
}
