use std::path::Path;

use rusqlite::{Connection, OpenFlags, params};

pub const INDEX_TABLE: &str = "searchIndex";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub id: i64,
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRewrite {
    pub id: i64,
    pub original: String,
    pub corrected: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadWrite,
    ReadOnly,
}

/// The docset search index. Only the `id` and `path` columns of
/// `searchIndex` are read or written; the schema is never touched.
pub struct SearchIndex {
    conn: Connection,
}

impl SearchIndex {
    pub fn open(path: &Path, mode: OpenMode) -> rusqlite::Result<Self> {
        // No SQLITE_OPEN_CREATE: a missing index must fail, not become an empty file.
        let flags = match mode {
            OpenMode::ReadWrite => OpenFlags::SQLITE_OPEN_READ_WRITE,
            OpenMode::ReadOnly => OpenFlags::SQLITE_OPEN_READ_ONLY,
        } | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Snapshot of every row, collected before any update runs.
    pub fn rows(&self) -> rusqlite::Result<Vec<IndexRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id, path FROM {INDEX_TABLE} ORDER BY id"))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(IndexRow {
                    id: row.get(0)?,
                    path: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn row_count(&self) -> rusqlite::Result<i64> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {INDEX_TABLE}"), [], |row| {
                row.get(0)
            })
    }

    /// Writes every rewrite and commits once. If any update fails the
    /// transaction is dropped and rolled back, so nothing is half-applied.
    pub fn apply_rewrites(&mut self, rewrites: &[PathRewrite]) -> rusqlite::Result<usize> {
        let tx = self.conn.transaction()?;
        let mut updated = 0usize;
        {
            let mut stmt = tx.prepare(&format!(
                "UPDATE {INDEX_TABLE} SET path = ?1 WHERE id = ?2"
            ))?;
            for rewrite in rewrites {
                updated += stmt.execute(params![rewrite.corrected, rewrite.id])?;
            }
        }
        tx.commit()?;
        Ok(updated)
    }
}
