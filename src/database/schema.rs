/*!
 * Database schema definitions and migrations.
 *
 * This module contains the SQL schema for the vocabulary table and
 * handles schema migrations for version upgrades.
 *
 * Version history:
 * - v1: `vocabulary` keyed by (word_text, target_language) only.
 * - v2: `vocabulary` keyed by (word_text, source_language, target_language).
 *
 * Databases written before versioning was introduced carry no
 * `schema_version` table; their layout is detected from the columns.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Source language assigned to rows migrated from the v1 layout
pub const UNDETERMINED_LANGUAGE: &str = "und";

const CREATE_VOCABULARY_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS vocabulary (
        id INTEGER PRIMARY KEY,
        word_text TEXT NOT NULL,
        source_language TEXT NOT NULL,
        target_language TEXT NOT NULL,
        translation TEXT,
        learning_status TEXT NOT NULL DEFAULT 'new',
        UNIQUE(word_text, source_language, target_language)
    );

    CREATE INDEX IF NOT EXISTS idx_vocabulary_status ON vocabulary(learning_status);
    CREATE INDEX IF NOT EXISTS idx_vocabulary_languages ON vocabulary(source_language, target_language);
"#;

/// Layout found when a database is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoredLayout {
    /// No vocabulary table yet
    Empty,
    /// Version recorded in `schema_version`
    Versioned(i32),
    /// No recorded version; layout inferred from the table columns
    Unversioned(i32),
}

/// Initialize the database schema
///
/// Safe to call any number of times; a database that is already current is
/// left untouched. Every change runs in one transaction, so a failed
/// migration leaves the database as it was.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    match detect_layout(conn)? {
        StoredLayout::Empty => {
            info!("Initializing database schema v{}", SCHEMA_VERSION);
            create_all_tables(conn)
        }
        StoredLayout::Versioned(version) if version == SCHEMA_VERSION => {
            debug!("Database schema is up to date (v{})", version);
            Ok(())
        }
        StoredLayout::Unversioned(version) if version == SCHEMA_VERSION => {
            adopt_unversioned(conn)
        }
        StoredLayout::Versioned(version) | StoredLayout::Unversioned(version)
            if version < SCHEMA_VERSION =>
        {
            info!(
                "Migrating database schema from v{} to v{}",
                version, SCHEMA_VERSION
            );
            migrate_schema(conn, version)
        }
        StoredLayout::Versioned(version) | StoredLayout::Unversioned(version) => {
            Err(anyhow::anyhow!(
                "Database schema v{} is newer than supported v{}",
                version,
                SCHEMA_VERSION
            ))
        }
    }
}

/// Work out which layout the database holds
///
/// A `schema_version` table without a row (left behind by an interrupted
/// upgrade of an earlier release) counts as unversioned.
fn detect_layout(conn: &Connection) -> Result<StoredLayout> {
    if table_exists(conn, "schema_version")? {
        let recorded: Option<i32> = conn
            .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()
            .context("Failed to read schema version")?;

        if let Some(version) = recorded {
            return Ok(StoredLayout::Versioned(version));
        }
        debug!("schema_version holds no row, inspecting the vocabulary table");
    }

    if !table_exists(conn, "vocabulary")? {
        return Ok(StoredLayout::Empty);
    }

    let version = if column_exists(conn, "vocabulary", "source_language")? {
        2
    } else {
        1
    };
    debug!("Found unversioned vocabulary table (layout v{})", version);
    Ok(StoredLayout::Unversioned(version))
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [name],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to check {} table existence", name))?;
    Ok(exists)
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read the columns of {}", table))?;
    Ok(columns.iter().any(|c| c == column))
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

fn create_version_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // WAL keeps readers unblocked while a write is in flight
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    let tx = conn.unchecked_transaction()?;
    create_version_table(&tx)?;
    tx.execute_batch(CREATE_VOCABULARY_TABLE)?;
    set_schema_version(&tx, SCHEMA_VERSION)?;
    tx.commit()?;

    info!("Database schema created successfully");
    Ok(())
}

/// Record the version of a current-layout table written before versioning
fn adopt_unversioned(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    create_version_table(&tx)?;
    // Layout is already current; only the status labels need adopting.
    rename_legacy_statuses(&tx)?;
    set_schema_version(&tx, SCHEMA_VERSION)?;
    tx.commit()?;

    info!("Adopted unversioned vocabulary table as v{}", SCHEMA_VERSION);
    Ok(())
}

/// Migrate the schema from one version to another
fn migrate_schema(conn: &Connection, from_version: i32) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let mut current = from_version;

    while current < SCHEMA_VERSION {
        match current {
            1 => {
                migrate_v1_to_v2(&tx)?;
                current = 2;
            }
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown schema version: {}. Cannot migrate.",
                    current
                ));
            }
        }
    }

    create_version_table(&tx)?;
    set_schema_version(&tx, SCHEMA_VERSION)?;
    tx.commit()?;

    info!("Schema migration completed to v{}", SCHEMA_VERSION);
    Ok(())
}

/// Rebuild the v1 table with a source language column.
///
/// v1 rows never recorded their source language, so they are filed under
/// `und`. They stay reachable through `list` and can be re-keyed by
/// deleting and translating the word again. Runs inside the caller's
/// transaction.
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        r#"
        ALTER TABLE vocabulary RENAME TO vocabulary_v1;
        DROP INDEX IF EXISTS idx_vocabulary_status;
        DROP INDEX IF EXISTS idx_vocabulary_languages;
        {create}
        INSERT OR IGNORE INTO vocabulary (word_text, source_language, target_language, translation, learning_status)
            SELECT word_text, '{und}', target_language, translation, COALESCE(learning_status, 'new')
            FROM vocabulary_v1
            ORDER BY id;
        DROP TABLE vocabulary_v1;
        "#,
        create = CREATE_VOCABULARY_TABLE,
        und = UNDETERMINED_LANGUAGE,
    ))
    .context("Failed to migrate vocabulary table from v1 to v2")?;
    rename_legacy_statuses(conn)?;

    Ok(())
}

/// Map the Spanish status labels written by earlier releases to the
/// current ones.
fn rename_legacy_statuses(conn: &Connection) -> Result<()> {
    let renamed = conn.execute(
        r#"
        UPDATE vocabulary SET learning_status = CASE learning_status
            WHEN 'nueva' THEN 'new'
            WHEN 'aprendiendo' THEN 'learning'
            WHEN 'conocida' THEN 'known'
            ELSE learning_status
        END
        WHERE learning_status IN ('nueva', 'aprendiendo', 'conocida')
        "#,
        [],
    )?;
    if renamed > 0 {
        info!("Renamed {} legacy learning status labels", renamed);
    }
    Ok(())
}
