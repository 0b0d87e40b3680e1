//! Write operations for the inventory cache and the parts index.

use partsdb_catalog::{CanonicalPart, CategoryIndexRow, RawComponent, RunMetadata, StoreError};
use rusqlite::{Connection, params};
use thiserror::Error;

use crate::schema::SchemaError;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
    #[error("Batch size must be at least 1")]
    ZeroBatchSize,
}

impl From<OperationError> for StoreError {
    fn from(err: OperationError) -> Self {
        StoreError::backend(err)
    }
}

/// SQLite integers are signed. Sizes past `i64::MAX` are clamped.
pub(crate) fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// ── Inventory Cache Operations ──────────────────────────────────────────────

/// Insert or replace a manufacturer.
pub fn insert_manufacturer(conn: &Connection, id: i64, name: &str) -> Result<(), OperationError> {
    conn.execute(
        "INSERT OR REPLACE INTO manufacturers (id, name) VALUES (?1, ?2)",
        params![id, name],
    )?;
    Ok(())
}

/// Insert or replace a category pair.
pub fn insert_category(
    conn: &Connection,
    id: i64,
    category: &str,
    subcategory: &str,
) -> Result<(), OperationError> {
    conn.execute(
        "INSERT OR REPLACE INTO categories (id, category, subcategory) VALUES (?1, ?2, ?3)",
        params![id, category, subcategory],
    )?;
    Ok(())
}

/// Insert or replace a component row.
pub fn insert_component(conn: &Connection, component: &RawComponent) -> Result<(), OperationError> {
    conn.execute(
        "INSERT OR REPLACE INTO components
            (lcsc, category_id, mfr, package, joints, manufacturer_id, basic, preferred,
             description, datasheet, stock, price, extra, last_on_stock)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            component.lcsc,
            component.category_id,
            component.mfr,
            component.package,
            component.joints,
            component.manufacturer_id,
            component.basic,
            component.preferred,
            component.description,
            component.datasheet,
            component.stock,
            component.price,
            component.extra,
            component.last_on_stock,
        ],
    )?;
    Ok(())
}

// ── Parts Index Operations ──────────────────────────────────────────────────

/// Insert a batch of parts in one transaction. Either every row is written
/// or none is.
pub fn insert_parts(conn: &Connection, parts: &[CanonicalPart]) -> Result<(), OperationError> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO parts VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )?;
        for part in parts {
            stmt.execute(params![
                part.lcsc_part,
                part.first_category,
                part.second_category,
                part.mfr_part,
                part.package,
                part.solder_joints,
                part.manufacturer,
                part.library_type.as_str(),
                part.description,
                part.datasheet,
                part.price,
                part.stock,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Write the category index rows in the order given.
pub fn insert_category_index(
    conn: &Connection,
    rows: &[CategoryIndexRow],
) -> Result<(), OperationError> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare_cached("INSERT INTO categories VALUES (?1, ?2)")?;
        for row in rows {
            stmt.execute(params![row.first_category, row.second_category])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Merge the FTS5 index segments into one b-tree.
pub fn optimize_index(conn: &Connection) -> Result<(), OperationError> {
    conn.execute("INSERT INTO parts(parts) VALUES('optimize')", [])?;
    Ok(())
}

/// Replace the metadata row of the index.
pub fn write_run_metadata(conn: &Connection, metadata: &RunMetadata) -> Result<(), OperationError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM meta", [])?;
    tx.execute(
        "INSERT INTO meta VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            metadata.source_name,
            to_sql_int(metadata.size_bytes),
            to_sql_int(metadata.part_count),
            metadata.date_string(),
            metadata.last_update_string(),
        ],
    )?;
    tx.commit()?;
    Ok(())
}
