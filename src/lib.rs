//! dbconn - open one database session from an explicit configuration
//!
//! # Example
//! ```ignore
//! use dbconn::{ConnectionConfig, ConnectionProvider, DriverKind, ErrorKind};
//!
//! let config = ConnectionConfig::new(DriverKind::MySql, "db.local", "app", "reader")
//!     .with_port(3306)
//!     .with_password("secret");
//! let provider = ConnectionProvider::new(config)?;
//!
//! match provider.get_connection().await {
//!     Ok(mut conn) => {
//!         conn.ping().await?;
//!         conn.close().await?;
//!     }
//!     Err(e) if e.kind() == ErrorKind::AuthRejected => { /* fix credentials */ }
//!     Err(e) => return Err(e),
//! }
//! ```

pub mod config;
pub mod drivers;
pub mod error;
pub mod traits;

mod provider;

// Re-export main types for convenient access
pub use config::{ConnectionConfig, DriverKind};
pub use error::{ConnectError, ErrorKind, Result};
pub use provider::{driver_for, ConnectionProvider};
pub use traits::{Connection, DatabaseDriver};
