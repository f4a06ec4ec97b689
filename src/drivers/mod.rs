#[cfg(feature = "mysql")]
mod mysql;
#[cfg(feature = "postgres")]
mod postgres;

pub use self::in_memory_test::{InMemoryConnection, InMemoryTestDriver, RecordedConnect};
#[cfg(feature = "mysql")]
pub use self::mysql::{MySqlConnection, MySqlDriver};
#[cfg(feature = "postgres")]
pub use self::postgres::{PostgresConnection, TokioPostgresDriver};
