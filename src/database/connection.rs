/*!
 * Vocabulary database connection.
 *
 * One SQLite connection serves the whole process. It sits behind a mutex
 * and every operation runs on tokio's blocking pool: acquire, run, release.
 * Individual operations are atomic; nothing spans two of them.
 *
 * Other processes (a second CLI invocation, a backup tool) may hold the
 * file at the same time, so writers wait up to `BUSY_TIMEOUT` for a lock
 * instead of failing right away.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::schema;

/// Database file name inside the data directory
const DATABASE_FILE: &str = "vocabulary.sqlite";

/// Application directory under the user's data directory
const APP_DIR: &str = "lector";

/// How long a statement waits for a lock held by another connection
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the vocabulary database
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Database file, or `:memory:`
    db_path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open the database in the user's data directory
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_database_path()?)
    }

    /// Open (or create) the database file at `db_path`
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {:?}", parent)
            })?;
        }

        info!("Opening vocabulary database at: {:?}", db_path);
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        Self::prepare(conn, db_path)
    }

    /// Open a private in-memory database
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory database");
        let conn =
            Connection::open_in_memory().context("Failed to create in-memory database")?;

        Self::prepare(conn, PathBuf::from(":memory:"))
    }

    fn prepare(conn: Connection, db_path: PathBuf) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .context("Failed to set the database busy timeout")?;
        // WAL makes NORMAL durable across application crashes
        conn.pragma_update(None, "synchronous", "NORMAL")
            .context("Failed to set the database synchronous mode")?;

        schema::initialize_schema(&conn)
            .with_context(|| format!("Failed to initialize database schema: {:?}", db_path))?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Location used when the configuration names no database file
    pub fn default_database_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(APP_DIR).join(DATABASE_FILE))
    }

    /// Database file path (`:memory:` for in-memory databases)
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` with the connection on the blocking thread pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.connection);

        tokio::task::spawn_blocking(move || f(&conn.lock()))
            .await
            .context("Database task panicked")?
    }
}
