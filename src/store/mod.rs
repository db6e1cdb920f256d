//! Store engine
//!
//! Single-file SQLite store of compressed molecule payloads.
//!
//! ## Schema
//!
//! ```text
//! structures
//! ┌──────────────┬─────────┬───────────────────────────────────────────┐
//! │ id           │ INTEGER │ PRIMARY KEY AUTOINCREMENT (monotonic)     │
//! │ desc         │ TEXT    │ coarse partition/filter key, indexed      │
//! │ comment      │ TEXT    │ secondary filter key, indexed             │
//! │ payload      │ BLOB    │ framed, compressed mol2 text              │
//! │ compression  │ INTEGER │ level 0-9, diagnostic only                │
//! └──────────────┴─────────┴───────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model: Single-Writer / Multiple-Reader
//!
//! A `Store` is the only writer of its backing file; mutating operations
//! take `&mut self` and run inside one exclusive transaction, so a batch
//! either commits whole or leaves the file untouched. Readers may share the
//! file through separate handles (SQLite WAL mode), but must not overlap an
//! in-flight write from another process.

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::codec;
use crate::compress::{self, CompressionLevel};
use crate::error::Result;
use crate::model::Molecule;

/// One batch insert entry: molecules tagged with desc/comment
#[derive(Debug, Clone, Copy)]
pub struct BatchEntry<'a> {
    pub desc: &'a str,
    pub comment: &'a str,
    pub molecules: &'a [Molecule],
}

/// A row whose payload has already been encoded and compressed
#[derive(Debug, Clone)]
pub(crate) struct CompressedRow {
    pub desc: String,
    pub comment: String,
    pub payload: Vec<u8>,
    pub level: CompressionLevel,
}

/// Handle to one store file
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a store at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open a store backed by memory only (tests)
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(std::time::Duration::from_millis(5000))?;
        // WAL keeps readers unblocked while a batch commits; in-memory
        // connections reject it, which is fine.
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS structures (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                "desc"      TEXT NOT NULL,
                comment     TEXT NOT NULL,
                payload     BLOB NOT NULL,
                compression INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_structures_desc ON structures("desc");
            CREATE INDEX IF NOT EXISTS idx_structures_comment ON structures(comment);
            "#,
        )?;
        debug!("store schema ready");
        Ok(Store { conn })
    }

    /// Insert a batch of records in one transaction
    ///
    /// Each entry's molecules are encoded to mol2 text and compressed at
    /// `level` into one row. The whole batch commits atomically: any failure
    /// rolls every row back. Returns the assigned ids in insertion order.
    pub fn insert_batch(&mut self, entries: &[BatchEntry], level: CompressionLevel) -> Result<Vec<i64>> {
        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let text = codec::encode(entry.molecules);
            rows.push(CompressedRow {
                desc: entry.desc.to_string(),
                comment: entry.comment.to_string(),
                payload: compress::compress(text.as_bytes(), level)?,
                level,
            });
        }
        self.insert_compressed(rows)
    }

    /// Insert pre-compressed rows in one transaction
    pub(crate) fn insert_compressed(&mut self, rows: Vec<CompressedRow>) -> Result<Vec<i64>> {
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(rows.len());
        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO structures ("desc", comment, payload, compression)
                   VALUES (?1, ?2, ?3, ?4)"#,
            )?;
            for row in &rows {
                stmt.execute(params![row.desc, row.comment, row.payload, row.level.get()])?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;
        info!(rows = ids.len(), "batch committed");
        Ok(ids)
    }

    /// Decode every molecule from records matching the filters
    ///
    /// `None` or an empty string means "match all" for that filter;
    /// otherwise the match is exact. Records are visited in ascending id
    /// order and molecules keep their position within each payload.
    pub fn select_all(
        &self,
        desc: Option<&str>,
        comment: Option<&str>,
    ) -> Result<Vec<Molecule>> {
        let (clause, filters) = filter_clause(desc, comment);
        let sql = format!(
            "SELECT payload FROM structures{} ORDER BY id ASC",
            clause
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(filters))?;

        let mut molecules = Vec::new();
        while let Some(row) = rows.next()? {
            let payload: Vec<u8> = row.get(0)?;
            let raw = compress::decompress(&payload)?;
            let text = String::from_utf8(raw).map_err(|e| {
                crate::error::Mol2DbError::Store(format!("payload is not valid UTF-8: {}", e))
            })?;
            molecules.extend(codec::decode(&text)?);
        }
        Ok(molecules)
    }

    /// Count records matching the filters
    pub fn count_matching(&self, desc: Option<&str>, comment: Option<&str>) -> Result<u64> {
        let (clause, filters) = filter_clause(desc, comment);
        let sql = format!("SELECT COUNT(*) FROM structures{}", clause);
        let count: i64 = self
            .conn
            .query_row(&sql, rusqlite::params_from_iter(filters), |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Distinct `desc` values in first-seen (ascending id) order
    pub fn list_descriptions(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(r#"SELECT "desc" FROM structures GROUP BY "desc" ORDER BY MIN(id)"#)?;
        let descriptions = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(descriptions)
    }
}

/// Build the WHERE clause for the optional exact-match filters
///
/// Empty strings are treated the same as absent filters, matching the CLI's
/// "default empty = unfiltered" contract.
fn filter_clause<'a>(
    desc: Option<&'a str>,
    comment: Option<&'a str>,
) -> (String, Vec<&'a str>) {
    let mut clauses = Vec::new();
    let mut filters = Vec::new();

    if let Some(desc) = desc.filter(|d| !d.is_empty()) {
        clauses.push(r#""desc" = ?"#);
        filters.push(desc);
    }
    if let Some(comment) = comment.filter(|c| !c.is_empty()) {
        clauses.push("comment = ?");
        filters.push(comment);
    }

    if clauses.is_empty() {
        (String::new(), filters)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), filters)
    }
}
