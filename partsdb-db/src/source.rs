//! `ComponentStore` over an SQLite inventory cache.

use std::path::Path;

use partsdb_catalog::{
    CategoryTable, ComponentBatches, ComponentFilter, ComponentStore, ManufacturerTable,
    RawComponent, StoreError,
};
use rusqlite::Connection;

use crate::operations::OperationError;
use crate::queries;
use crate::schema::{self, SchemaError};

/// Inventory cache read through one SQLite connection.
pub struct SqliteComponentStore {
    conn: Connection,
    name: String,
}

impl SqliteComponentStore {
    /// Open the cache at `path`. The file name is recorded as the source name.
    pub fn open(path: &Path) -> Result<Self, SchemaError> {
        let conn = schema::open_source(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { conn, name })
    }

    pub fn from_connection(conn: Connection, name: impl Into<String>) -> Self {
        Self {
            conn,
            name: name.into(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ComponentStore for SqliteComponentStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn count(&self, filter: &ComponentFilter) -> Result<u64, StoreError> {
        Ok(queries::count_components(&self.conn, filter)?)
    }

    fn fetch<'a>(
        &'a self,
        filter: &ComponentFilter,
        batch_size: usize,
    ) -> Result<ComponentBatches<'a>, StoreError> {
        if batch_size == 0 {
            return Err(OperationError::ZeroBatchSize.into());
        }
        Ok(Box::new(PageIter {
            conn: &self.conn,
            filter: filter.clone(),
            batch_size,
            after: i64::MIN,
            done: false,
        }))
    }

    fn manufacturers(&self) -> Result<ManufacturerTable, StoreError> {
        Ok(queries::load_manufacturers(&self.conn)?)
    }

    fn categories(&self) -> Result<CategoryTable, StoreError> {
        Ok(queries::load_categories(&self.conn)?)
    }
}

/// Keyset pagination on `lcsc`. Each page resumes after the last key seen,
/// so the cost per page does not grow with the offset.
struct PageIter<'a> {
    conn: &'a Connection,
    filter: ComponentFilter,
    batch_size: usize,
    after: i64,
    done: bool,
}

impl Iterator for PageIter<'_> {
    type Item = Result<Vec<RawComponent>, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let page =
            match queries::fetch_component_page(self.conn, &self.filter, self.after, self.batch_size) {
                Ok(page) => page,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };

        let Some(last) = page.last() else {
            self.done = true;
            return None;
        };
        self.after = last.lcsc;
        if page.len() < self.batch_size {
            self.done = true;
        }
        Some(Ok(page))
    }
}
