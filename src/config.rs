use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{ConnectError, Result};

/// Wire protocol / client library used to reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverKind {
    #[default]
    MySql,
    Postgres,
}

impl DriverKind {
    pub fn name(&self) -> &'static str {
        match self {
            DriverKind::MySql => "mysql",
            DriverKind::Postgres => "postgres",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            DriverKind::MySql => 3306,
            DriverKind::Postgres => 5432,
        }
    }

    /// Whether the backend for this driver was compiled into the crate.
    pub fn is_available(&self) -> bool {
        match self {
            DriverKind::MySql => cfg!(feature = "mysql"),
            DriverKind::Postgres => cfg!(feature = "postgres"),
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DriverKind {
    type Err = ConnectError;

    /// Accepts short names as well as the JDBC driver class names
    /// still found in older configuration files.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" | "com.mysql.jdbc.driver" | "com.mysql.cj.jdbc.driver" => {
                Ok(DriverKind::MySql)
            }
            "postgres" | "postgresql" | "org.postgresql.driver" => Ok(DriverKind::Postgres),
            other => Err(ConnectError::DriverUnavailable(format!(
                "unknown driver identifier '{}'",
                other
            ))),
        }
    }
}

/// Everything needed to open one session against a database server.
///
/// Built explicitly by the caller, deserialized with serde, or read from
/// the environment with [`ConnectionConfig::from_env`].
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct ConnectionConfig {
    pub driver: DriverKind,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectionConfig {
    /// Create a config using the driver's default port and an empty password.
    pub fn new(
        driver: DriverKind,
        host: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            driver,
            host: host.into(),
            port: driver.default_port(),
            database: database.into(),
            user: user.into(),
            password: String::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Check that a connect attempt with this config is meaningful.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConnectError::InvalidConfig("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(ConnectError::InvalidConfig("port must be in 1..=65535".into()));
        }
        if self.database.trim().is_empty() {
            return Err(ConnectError::InvalidConfig(
                "database name must not be empty".into(),
            ));
        }
        if self.user.trim().is_empty() {
            return Err(ConnectError::InvalidConfig("user must not be empty".into()));
        }
        Ok(())
    }

    /// `host:port/database`
    pub fn endpoint(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }

    /// Password to hand to the driver. Empty means none.
    pub(crate) fn password_opt(&self) -> Option<&str> {
        if self.password.is_empty() {
            None
        } else {
            Some(&self.password)
        }
    }

    /// Read `{PREFIX}_DRIVER`, `{PREFIX}_HOST`, `{PREFIX}_PORT`,
    /// `{PREFIX}_DATABASE`, `{PREFIX}_USER` and `{PREFIX}_PASSWORD`.
    pub fn from_env(prefix: &str) -> Result<Self> {
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    /// Same as [`ConnectionConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{}_{}", prefix, name));
        let require = |name: &str| {
            get(name).ok_or_else(|| {
                ConnectError::InvalidConfig(format!("{}_{} is not set", prefix, name))
            })
        };

        let port = match get("PORT") {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|_| {
                ConnectError::InvalidConfig(format!("{}_PORT is not a valid port: {}", prefix, raw))
            })?),
            None => None,
        };

        let raw = RawConfig {
            driver: get("DRIVER"),
            host: require("HOST")?,
            port,
            database: require("DATABASE")?,
            user: require("USER")?,
            password: get("PASSWORD").unwrap_or_default(),
        };
        raw.try_into()
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("ConnectionConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &password)
            .finish()
    }
}

/// Serialized form; missing driver and port fall back to defaults.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    driver: Option<String>,
    host: String,
    #[serde(default)]
    port: Option<u16>,
    database: String,
    user: String,
    #[serde(default)]
    password: String,
}

impl TryFrom<RawConfig> for ConnectionConfig {
    type Error = ConnectError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let driver = match raw.driver {
            Some(id) => id.parse()?,
            None => DriverKind::default(),
        };
        Ok(Self {
            driver,
            host: raw.host,
            port: raw.port.unwrap_or_else(|| driver.default_port()),
            database: raw.database,
            user: raw.user,
            password: raw.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_driver_identifiers() {
        assert_eq!("mysql".parse::<DriverKind>().unwrap(), DriverKind::MySql);
        assert_eq!(
            "com.mysql.jdbc.Driver".parse::<DriverKind>().unwrap(),
            DriverKind::MySql
        );
        assert_eq!(
            "org.postgresql.Driver".parse::<DriverKind>().unwrap(),
            DriverKind::Postgres
        );
        let err = "oracle".parse::<DriverKind>().unwrap_err();
        assert!(matches!(err, ConnectError::DriverUnavailable(_)));
    }

    #[test]
    fn test_new_uses_default_port() {
        let config = ConnectionConfig::new(DriverKind::MySql, "db.local", "app", "reader");
        assert_eq!(config.port, 3306);
        assert_eq!(config.password, "");
        assert_eq!(config.endpoint(), "db.local:3306/app");
    }

    #[test]
    fn test_validate() {
        let config = ConnectionConfig::new(DriverKind::MySql, "db.local", "app", "reader");
        assert!(config.validate().is_ok());

        let err = config.clone().with_port(0).validate().unwrap_err();
        assert!(matches!(err, ConnectError::InvalidConfig(_)));

        let mut no_host = config.clone();
        no_host.host = "  ".to_string();
        assert!(no_host.validate().is_err());

        let mut no_db = config.clone();
        no_db.database.clear();
        assert!(no_db.validate().is_err());

        let mut no_user = config;
        no_user.user.clear();
        assert!(no_user.validate().is_err());
    }

    #[test]
    fn test_empty_password_is_allowed() {
        let config = ConnectionConfig::new(DriverKind::MySql, "db.local", "app", "reader");
        assert!(config.validate().is_ok());
        assert_eq!(config.password_opt(), None);
        assert_eq!(config.with_password("s3cret").password_opt(), Some("s3cret"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ConnectionConfig::new(DriverKind::Postgres, "pg", "app", "admin")
            .with_password("hunter2");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_from_lookup() {
        let vars = env(&[
            ("APP_DB_DRIVER", "postgresql"),
            ("APP_DB_HOST", "pg.internal"),
            ("APP_DB_DATABASE", "orders"),
            ("APP_DB_USER", "svc"),
            ("APP_DB_PASSWORD", "pw"),
        ]);
        let config = ConnectionConfig::from_lookup("APP_DB", |k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.driver, DriverKind::Postgres);
        assert_eq!(config.port, 5432);
        assert_eq!(config.endpoint(), "pg.internal:5432/orders");
        assert_eq!(config.password, "pw");
    }

    #[test]
    fn test_from_lookup_errors() {
        let missing_host = env(&[("X_DATABASE", "d"), ("X_USER", "u")]);
        let err = ConnectionConfig::from_lookup("X", |k| missing_host.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConnectError::InvalidConfig(_)));

        let bad_port = env(&[
            ("X_HOST", "h"),
            ("X_PORT", "99999"),
            ("X_DATABASE", "d"),
            ("X_USER", "u"),
        ]);
        let err = ConnectionConfig::from_lookup("X", |k| bad_port.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConnectError::InvalidConfig(_)));
    }
}
