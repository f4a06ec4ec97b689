use std::error::Error as _;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls};

use crate::config::{ConnectionConfig, DriverKind};
use crate::error::{ConnectError, Result};
use crate::traits::{Connection, DatabaseDriver};

/// PostgreSQL driver implementation using tokio-postgres.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPostgresDriver;

impl TokioPostgresDriver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseDriver for TokioPostgresDriver {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>> {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&config.host)
            .port(config.port)
            .dbname(&config.database)
            .user(&config.user);
        if let Some(password) = config.password_opt() {
            pg.password(password);
        }

        let (client, connection) = pg
            .connect(NoTls)
            .await
            .map_err(|e| classify_connect_error(e, config))?;

        // Spawn the connection handler
        let task = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!(error = %e, "postgres connection closed with error");
            }
        });

        let row = client
            .query_one(
                "SELECT pg_backend_pid(), current_setting('server_version')",
                &[],
            )
            .await
            .map_err(|e| ConnectError::ConnectionFailed(e.to_string()))?;
        let pid: i32 = row.get(0);
        let version: String = row.get(1);

        Ok(Box::new(PostgresConnection {
            client,
            task,
            pid,
            version,
        }))
    }

    fn kind(&self) -> DriverKind {
        DriverKind::Postgres
    }
}

/// An open PostgreSQL session plus the task driving its socket.
pub struct PostgresConnection {
    client: Client,
    task: JoinHandle<()>,
    pid: i32,
    version: String,
}

#[async_trait]
impl Connection for PostgresConnection {
    fn id(&self) -> u64 {
        self.pid as u64
    }

    fn driver(&self) -> DriverKind {
        DriverKind::Postgres
    }

    fn server_version(&self) -> Option<String> {
        Some(self.version.clone())
    }

    async fn ping(&mut self) -> Result<()> {
        self.client
            .simple_query("")
            .await
            .map(|_| ())
            .map_err(|e| ConnectError::Disconnected(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let PostgresConnection { client, task, .. } = *self;
        // Dropping the client ends the connection future.
        drop(client);
        task.await
            .map_err(|e| ConnectError::Disconnected(e.to_string()))
    }
}

fn classify_connect_error(err: tokio_postgres::Error, config: &ConnectionConfig) -> ConnectError {
    if let Some(code) = err.code() {
        if *code == SqlState::INVALID_PASSWORD
            || *code == SqlState::INVALID_AUTHORIZATION_SPECIFICATION
        {
            let message = err
                .as_db_error()
                .map(|db| db.message().to_string())
                .unwrap_or_else(|| err.to_string());
            return ConnectError::AuthRejected(message);
        }
        if *code == SqlState::INVALID_CATALOG_NAME {
            return ConnectError::UnknownDatabase(config.database.clone());
        }
    }

    let is_io = err
        .source()
        .map(|source| source.is::<std::io::Error>())
        .unwrap_or(false);
    if is_io {
        return ConnectError::NetworkUnreachable(format!("{}: {}", config.endpoint(), err));
    }

    ConnectError::ConnectionFailed(err.to_string())
}
