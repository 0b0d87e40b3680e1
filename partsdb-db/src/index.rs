//! `SearchIndexStore` over an SQLite FTS5 parts index.

use std::path::{Path, PathBuf};

use partsdb_catalog::{
    CanonicalPart, CategoryIndexRow, RunMetadata, SearchIndexStore, StoreError,
};
use rusqlite::Connection;

use crate::operations::{self, OperationError};
use crate::queries::{self, IndexStats};
use crate::schema::{self, SchemaError};

/// Default number of rows returned by [`SqlitePartsIndex::search`].
pub const SEARCH_LIMIT: usize = 100;

/// A parts index being built, or opened for inspection.
pub struct SqlitePartsIndex {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqlitePartsIndex {
    /// Start a new index at `path`. Any file already there is deleted.
    pub fn create(path: &Path) -> Result<Self, SchemaError> {
        let conn = schema::open_index(path)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a finished index without modifying it.
    pub fn open(path: &Path) -> Result<Self, SchemaError> {
        let conn = Connection::open(path)?;
        for table in schema::INDEX_TABLES {
            if !schema::table_exists(&conn, table)? {
                return Err(SchemaError::MissingTable(table.to_string()));
            }
        }
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_memory() -> Result<Self, SchemaError> {
        Ok(Self {
            conn: schema::open_index_memory()?,
            path: None,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ── Read helpers ────────────────────────────────────────────────────────

    pub fn category_count(&self) -> Result<u64, OperationError> {
        Ok(queries::list_categories(&self.conn)?.len() as u64)
    }

    /// Category rows in the order they were written.
    pub fn categories(&self) -> Result<Vec<CategoryIndexRow>, OperationError> {
        queries::list_categories(&self.conn)
    }

    pub fn run_metadata(&self) -> Result<Option<RunMetadata>, OperationError> {
        queries::read_run_metadata(&self.conn)
    }

    pub fn search(&self, term: &str) -> Result<Vec<CanonicalPart>, OperationError> {
        queries::search_parts(&self.conn, term, SEARCH_LIMIT)
    }

    pub fn stats(&self) -> Result<IndexStats, OperationError> {
        queries::index_stats(&self.conn)
    }

    fn page_bytes(&self) -> Result<u64, OperationError> {
        let pages: i64 = self.conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
        let page_size: i64 = self.conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;
        Ok((pages.max(0) as u64) * (page_size.max(0) as u64))
    }
}

impl SearchIndexStore for SqlitePartsIndex {
    fn create_schema(&mut self) -> Result<(), StoreError> {
        schema::create_index_schema(&self.conn).map_err(OperationError::from)?;
        Ok(())
    }

    fn insert_batch(&mut self, rows: &[CanonicalPart]) -> Result<(), StoreError> {
        Ok(operations::insert_parts(&self.conn, rows)?)
    }

    fn distinct_categories(&self) -> Result<Vec<CategoryIndexRow>, StoreError> {
        Ok(queries::distinct_part_categories(&self.conn)?)
    }

    fn insert_category_index(&mut self, rows: &[CategoryIndexRow]) -> Result<(), StoreError> {
        Ok(operations::insert_category_index(&self.conn, rows)?)
    }

    fn optimize(&mut self) -> Result<(), StoreError> {
        Ok(operations::optimize_index(&self.conn)?)
    }

    fn part_count(&self) -> Result<u64, StoreError> {
        Ok(queries::part_count(&self.conn)?)
    }

    fn size_bytes(&self) -> Result<u64, StoreError> {
        let size = match &self.path {
            Some(path) => std::fs::metadata(path)
                .map(|m| m.len())
                .map_err(OperationError::from)?,
            None => self.page_bytes()?,
        };
        Ok(size)
    }

    fn write_run_metadata(&mut self, metadata: &RunMetadata) -> Result<(), StoreError> {
        Ok(operations::write_run_metadata(&self.conn, metadata)?)
    }
}
