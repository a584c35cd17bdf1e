//! Database connection provider.
//!
//! Supports two backends:
//! - Local SQLite file: `path/to/db.sqlite` or `file:path` or `sqlite://path`
//! - Remote Turso: `libsql://...` or `https://...` (requires an auth token)
//!
//! Every handler call asks the provider for its own connection and drops it
//! when the call returns. Nothing is pooled or retried. Local files run in WAL
//! mode and every local connection waits up to [`BUSY_TIMEOUT`] for a lock.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use libsql::{Builder, Connection, Database};
use tracing::{debug, error, info};

use crate::config;

/// How long a local connection waits on a locked database before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Boxed future returned by [`Provider::connect`].
pub type ConnectFuture<'a> = Pin<Box<dyn Future<Output = crate::Result<Connection>> + Send + 'a>>;

/// Hands out one fresh connection per call.
///
/// Failures are reported as [`crate::Error::Connectivity`] after being logged.
pub trait Provider: Send + Sync {
    fn connect(&self) -> ConnectFuture<'_>;
}

/// libsql-backed provider. The database handle is opened once at startup.
pub struct Store {
    db: Database,
    local: bool,
}

impl Store {
    /// Open the database described by `config`.
    ///
    /// # URL formats
    /// - Local file: `escola.db`, `file:path/to/db.sqlite`, `sqlite://path`
    /// - Remote Turso: `libsql://your-db.turso.io`
    ///
    /// `:memory:` is rejected: each connection would see its own empty database.
    pub async fn open(config: &config::Database) -> crate::Result<Self> {
        let url = config.url.as_str();
        let store = if url.starts_with("libsql://") || url.starts_with("https://") {
            let token = config.auth_token.clone().ok_or_else(|| {
                crate::Error::Config("An auth token is required for remote databases".into())
            })?;
            let db = Builder::new_remote(url.to_string(), token).build().await?;
            Self { db, local: false }
        } else {
            let path = url
                .strip_prefix("sqlite://")
                .or_else(|| url.strip_prefix("file:"))
                .unwrap_or(url);
            if path.is_empty() || path == ":memory:" {
                return Err(crate::Error::Config(format!(
                    "Database url {url:?} does not name a file"
                )));
            }
            let db = Builder::new_local(path).build().await?;
            enable_wal(&db).await?;
            Self { db, local: true }
        };

        if config.bootstrap {
            let conn = store.connect().await?;
            bootstrap(&conn).await?;
            info!("Applied schema to {}", url);
        }

        Ok(store)
    }

    async fn open_connection(&self) -> crate::Result<Connection> {
        let conn = self.db.connect().map_err(|e| {
            error!("Database connection failed: {e}");
            crate::Error::Connectivity
        })?;
        if self.local {
            conn.busy_timeout(BUSY_TIMEOUT).map_err(|e| {
                error!("Database connection setup failed: {e}");
                crate::Error::Connectivity
            })?;
        }
        // SQLite leaves foreign keys off per connection
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| {
                error!("Database connection setup failed: {e}");
                crate::Error::Connectivity
            })?;
        Ok(conn)
    }
}

impl Provider for Store {
    fn connect(&self) -> ConnectFuture<'_> {
        Box::pin(self.open_connection())
    }
}

/// Switch a local file to write-ahead logging. The mode is stored in the file.
async fn enable_wal(db: &Database) -> crate::Result<()> {
    let conn = db.connect()?;
    let mut rows = conn.query("PRAGMA journal_mode = WAL", ()).await?;
    if let Some(row) = rows.next().await? {
        let mode: String = row.get(0)?;
        debug!(journal_mode = %mode, "Journal mode set");
    }
    Ok(())
}

/// DDL for every table the service reads and writes.
pub const SCHEMA: &str = include_str!("schema.sql");

/// Create the tables if they do not exist yet.
pub async fn bootstrap(conn: &Connection) -> crate::Result<()> {
    conn.execute_batch(SCHEMA).await?;
    Ok(())
}

// Primary SQLite result codes for statements the engine refused to run.
const SQLITE_ERROR: i32 = 1;
const SQLITE_TOOBIG: i32 = 18;
const SQLITE_CONSTRAINT: i32 = 19;
const SQLITE_MISMATCH: i32 = 20;
const SQLITE_RANGE: i32 = 25;

/// Turn a failed write statement into the client-facing error kind.
///
/// Only statement rejections reach the client as [`crate::Error::Constraint`].
/// Lock, I/O and other engine failures stay [`crate::Error::Database`].
pub(crate) fn rejected(err: libsql::Error) -> crate::Error {
    match err {
        libsql::Error::SqliteFailure(code, message) if is_statement_rejection(code) => {
            crate::Error::Constraint(message)
        }
        other => crate::Error::Database(other),
    }
}

fn is_statement_rejection(code: i32) -> bool {
    matches!(
        code & 0xff,
        SQLITE_ERROR | SQLITE_TOOBIG | SQLITE_CONSTRAINT | SQLITE_MISMATCH | SQLITE_RANGE
    )
}

// Re-export commonly used libsql types for convenience
pub use libsql::{Row, Value};
