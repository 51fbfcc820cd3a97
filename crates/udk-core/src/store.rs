//! SQLite persistence for article records.
//!
//! A single flat `documents` table. Rows are only ever appended: the store
//! exposes no update or delete operations.

use std::path::Path;

use rusqlite::{Connection, params};
use thiserror::Error;

use crate::ArticleRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A record read back from the table together with its row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: i64,
    pub record: ArticleRecord,
}

/// Handle to the `documents` table.
pub struct ArticleStore {
    conn: Connection,
}

impl ArticleStore {
    /// Open (or create) the database at `path` and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Self::with_connection(conn)
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Append all records of one file in a single transaction.
    pub fn insert_records(&mut self, records: &[ArticleRecord]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO documents (file_number, udk, content, keywords) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for r in records {
                stmt.execute(params![r.file_number, r.udk, r.content, r.keywords])?;
            }
        }
        tx.commit()?;
        tracing::debug!(rows = records.len(), "inserted records");
        Ok(records.len())
    }

    /// The first `limit` bodies in insertion order.
    pub fn fetch_contents(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT content FROM documents ORDER BY id LIMIT ?1")?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(row.get::<_, Option<String>>(0)?.unwrap_or_default())
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// All records, optionally restricted to one source file, in insertion order.
    pub fn fetch_records(&self, file_number: Option<u32>) -> Result<Vec<StoredRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, file_number, udk, content, keywords FROM documents \
             WHERE (?1 IS NULL OR file_number = ?1) ORDER BY id",
        )?;
        let rows = stmt.query_map(params![file_number], |row| {
            Ok(StoredRecord {
                id: row.get(0)?,
                record: ArticleRecord {
                    file_number: row.get::<_, Option<u32>>(1)?.unwrap_or_default(),
                    udk: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    content: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    keywords: row.get(4)?,
                },
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Number of rows in the table.
    pub fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Database(e))
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS documents (
             id          INTEGER PRIMARY KEY AUTOINCREMENT,
             file_number INTEGER,
             udk         TEXT,
             content     TEXT,
             keywords    TEXT
         );",
    )?;

    // Tables created without keyword support lack the last column.
    if !has_column(conn, "documents", "keywords")? {
        conn.execute_batch("ALTER TABLE documents ADD COLUMN keywords TEXT")?;
        tracing::info!("added keywords column to existing documents table");
    }
    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}
