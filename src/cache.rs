//! Content-addressed store for rendered plot artifacts.
//!
//! Entries are keyed by `(path, content hash)`, but each path keeps only its
//! most recent artifact: writing under a new hash replaces the old entry in
//! place. Callers check [`PlotCache::contains_current`] to skip re-rendering
//! files whose content has not changed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::info;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::SweepError;
use crate::identity::FileIdentity;

/// Storage for one rendered artifact per sweep file.
pub trait PlotCache {
    /// Stores `bytes` for `path`, replacing any artifact under another hash.
    fn put(&mut self, path: &Path, content_hash: &str, bytes: &[u8]) -> Result<(), SweepError>;

    /// The latest artifact stored for `path`.
    fn get(&self, path: &Path) -> Result<Option<Vec<u8>>, SweepError>;

    /// Whether the stored artifact for `path` was rendered from this content.
    fn contains_current(&self, path: &Path, content_hash: &str) -> Result<bool, SweepError>;

    /// Stores `bytes` for the file described by `identity`.
    fn put_for(&mut self, identity: &FileIdentity, bytes: &[u8]) -> Result<(), SweepError> {
        self.put(&identity.path, &identity.content_hash, bytes)
    }
}

// ============================================================================
// In-memory cache
// ============================================================================

/// A process-local cache, mostly useful in tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPlotCache {
    entries: BTreeMap<PathBuf, (String, Vec<u8>)>,
}

impl InMemoryPlotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PlotCache for InMemoryPlotCache {
    fn put(&mut self, path: &Path, content_hash: &str, bytes: &[u8]) -> Result<(), SweepError> {
        self.entries
            .insert(path.to_path_buf(), (content_hash.to_string(), bytes.to_vec()));
        Ok(())
    }

    fn get(&self, path: &Path) -> Result<Option<Vec<u8>>, SweepError> {
        Ok(self.entries.get(path).map(|(_, bytes)| bytes.clone()))
    }

    fn contains_current(&self, path: &Path, content_hash: &str) -> Result<bool, SweepError> {
        Ok(self
            .entries
            .get(path)
            .is_some_and(|(hash, _)| hash == content_hash))
    }
}

// ============================================================================
// SQLite cache
// ============================================================================

/// A cache persisted in a SQLite database.
pub struct SqlitePlotCache {
    conn: Connection,
}

impl SqlitePlotCache {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, SweepError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Creates a throwaway in-memory database.
    pub fn in_memory() -> Result<Self, SweepError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), SweepError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS plots (
                filepath TEXT,
                file_content_hash TEXT,
                image BLOB,
                PRIMARY KEY (filepath, file_content_hash)
            );
            "#,
        )?;
        Ok(())
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }
}

impl PlotCache for SqlitePlotCache {
    fn put(&mut self, path: &Path, content_hash: &str, bytes: &[u8]) -> Result<(), SweepError> {
        let key = Self::key(path);
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE plots SET file_content_hash = ?1, image = ?2 WHERE filepath = ?3",
            params![content_hash, bytes, key],
        )?;
        if updated == 0 {
            tx.execute(
                "INSERT INTO plots (filepath, file_content_hash, image) VALUES (?1, ?2, ?3)",
                params![key, content_hash, bytes],
            )?;
        }
        tx.commit()?;
        info!("cached {} bytes for {key}", bytes.len());
        Ok(())
    }

    fn get(&self, path: &Path) -> Result<Option<Vec<u8>>, SweepError> {
        let image = self
            .conn
            .query_row(
                "SELECT image FROM plots WHERE filepath = ?1",
                params![Self::key(path)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(image)
    }

    fn contains_current(&self, path: &Path, content_hash: &str) -> Result<bool, SweepError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM plots WHERE filepath = ?1 AND file_content_hash = ?2",
                params![Self::key(path), content_hash],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
