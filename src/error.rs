use thiserror::Error;

/// Error type for dbconn operations
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Driver not available: {0}")]
    DriverUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    #[error("Unknown database: {0}")]
    UnknownDatabase(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection lost: {0}")]
    Disconnected(String),
}

/// Fieldless discriminant of [`ConnectError`], for callers that branch on the
/// failure kind without caring about the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DriverUnavailable,
    InvalidConfig,
    NetworkUnreachable,
    AuthRejected,
    UnknownDatabase,
    ConnectionFailed,
    Disconnected,
}

impl ConnectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConnectError::DriverUnavailable(_) => ErrorKind::DriverUnavailable,
            ConnectError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            ConnectError::NetworkUnreachable(_) => ErrorKind::NetworkUnreachable,
            ConnectError::AuthRejected(_) => ErrorKind::AuthRejected,
            ConnectError::UnknownDatabase(_) => ErrorKind::UnknownDatabase,
            ConnectError::ConnectionFailed(_) => ErrorKind::ConnectionFailed,
            ConnectError::Disconnected(_) => ErrorKind::Disconnected,
        }
    }
}

/// Result type alias for dbconn operations
pub type Result<T> = std::result::Result<T, ConnectError>;
