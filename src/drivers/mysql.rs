use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, OptsBuilder};

use crate::config::{ConnectionConfig, DriverKind};
use crate::error::{ConnectError, Result};
use crate::traits::{Connection, DatabaseDriver};

// Server error codes that identify a specific failure kind.
const ER_DBACCESS_DENIED_ERROR: u16 = 1044;
const ER_ACCESS_DENIED_ERROR: u16 = 1045;
const ER_BAD_DB_ERROR: u16 = 1049;
const ER_ACCESS_DENIED_NO_PASSWORD_ERROR: u16 = 1698;

/// MySQL driver implementation using mysql_async.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDriver;

impl MySqlDriver {
    pub fn new() -> Self {
        Self
    }

    fn opts(config: &ConnectionConfig) -> OptsBuilder {
        OptsBuilder::default()
            .ip_or_hostname(config.host.clone())
            .tcp_port(config.port)
            .db_name(Some(config.database.clone()))
            .user(Some(config.user.clone()))
            .pass(config.password_opt().map(str::to_string))
    }
}

#[async_trait]
impl DatabaseDriver for MySqlDriver {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>> {
        let conn = Conn::new(Self::opts(config))
            .await
            .map_err(|e| classify_connect_error(e, config))?;
        Ok(Box::new(MySqlConnection { conn }))
    }

    fn kind(&self) -> DriverKind {
        DriverKind::MySql
    }
}

/// An open MySQL session.
pub struct MySqlConnection {
    conn: Conn,
}

#[async_trait]
impl Connection for MySqlConnection {
    fn id(&self) -> u64 {
        u64::from(self.conn.id())
    }

    fn driver(&self) -> DriverKind {
        DriverKind::MySql
    }

    fn server_version(&self) -> Option<String> {
        let (major, minor, patch) = self.conn.server_version();
        Some(format!("{}.{}.{}", major, minor, patch))
    }

    async fn ping(&mut self) -> Result<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| ConnectError::Disconnected(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn
            .disconnect()
            .await
            .map_err(|e| ConnectError::Disconnected(e.to_string()))
    }
}

fn classify_connect_error(err: mysql_async::Error, config: &ConnectionConfig) -> ConnectError {
    match err {
        mysql_async::Error::Io(e) => {
            ConnectError::NetworkUnreachable(format!("{}: {}", config.endpoint(), e))
        }
        mysql_async::Error::Server(e) => match e.code {
            ER_ACCESS_DENIED_ERROR | ER_DBACCESS_DENIED_ERROR | ER_ACCESS_DENIED_NO_PASSWORD_ERROR => {
                ConnectError::AuthRejected(e.message)
            }
            ER_BAD_DB_ERROR => ConnectError::UnknownDatabase(config.database.clone()),
            _ => ConnectError::ConnectionFailed(e.to_string()),
        },
        other => ConnectError::ConnectionFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_kind() {
        assert_eq!(MySqlDriver::new().kind(), DriverKind::MySql);
    }

    fn server_error(code: u16) -> mysql_async::Error {
        mysql_async::Error::Server(mysql_async::ServerError {
            code,
            message: format!("server said {}", code),
            state: "HY000".to_string(),
        })
    }

    #[test]
    fn test_server_error_codes_map_to_kinds() {
        let config = ConnectionConfig::new(DriverKind::MySql, "db.local", "RayVita", "reader");
        let cases = [
            (ER_DBACCESS_DENIED_ERROR, ErrorKind::AuthRejected),
            (ER_ACCESS_DENIED_ERROR, ErrorKind::AuthRejected),
            (ER_ACCESS_DENIED_NO_PASSWORD_ERROR, ErrorKind::AuthRejected),
            (ER_BAD_DB_ERROR, ErrorKind::UnknownDatabase),
            // ER_CON_COUNT_ERROR has no dedicated kind
            (1040, ErrorKind::ConnectionFailed),
        ];

        for (code, expected) in cases {
            let err = classify_connect_error(server_error(code), &config);
            assert_eq!(err.kind(), expected, "code {}", code);
        }
    }

    #[test]
    fn test_unknown_database_names_configured_database() {
        let config = ConnectionConfig::new(DriverKind::MySql, "db.local", "RayVita", "reader");
        let err = classify_connect_error(server_error(ER_BAD_DB_ERROR), &config);
        assert_eq!(err.to_string(), "Unknown database: RayVita");
    }

    #[tokio::test]
    #[ignore = "requires a MySQL server, see DBCONN_TEST_* variables"]
    async fn test_live_connect_and_ping() {
        let config = ConnectionConfig::from_env("DBCONN_TEST_MYSQL").unwrap();
        let mut conn = MySqlDriver::new().connect(&config).await.unwrap();
        conn.ping().await.unwrap();
        assert!(conn.server_version().is_some());
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_refused_port_is_network_unreachable() {
        // Nothing listens on port 1 on the loopback interface.
        let config = ConnectionConfig::new(DriverKind::MySql, "127.0.0.1", "app", "reader")
            .with_port(1);
        let err = MySqlDriver::new().connect(&config).await.err().unwrap();
        assert!(
            matches!(err, ConnectError::NetworkUnreachable(_)),
            "unexpected error: {:?}",
            err
        );
    }
}
