//! SQLite schema of the inventory cache and of the parts index.

use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing table '{0}'")]
    MissingTable(String),
}

/// Tables a readable inventory cache must have.
pub const SOURCE_TABLES: [&str; 3] = ["components", "manufacturers", "categories"];

/// Tables created in every parts index.
pub const INDEX_TABLES: [&str; 4] = ["parts", "mapping", "meta", "categories"];

/// Create the inventory cache tables if they don't exist.
///
/// The cache is normally produced by the scraper. This is used for fixtures
/// and for bootstrapping an empty cache.
pub fn create_source_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SOURCE_SCHEMA_SQL)?;
    Ok(())
}

/// Create the parts index tables if they don't exist. Idempotent.
pub fn create_index_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(INDEX_SCHEMA_SQL)?;
    Ok(())
}

/// Open an existing inventory cache and check that its tables are present.
pub fn open_source(path: &Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    for table in SOURCE_TABLES {
        if !table_exists(&conn, table)? {
            return Err(SchemaError::MissingTable(table.to_string()));
        }
    }
    Ok(conn)
}

/// Open an in-memory inventory cache with the full schema. Useful for testing.
pub fn open_source_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    create_source_schema(&conn)?;
    Ok(conn)
}

/// Create a fresh parts index at `path`, replacing any previous file.
///
/// The schema is not created here; the build pipeline does that as its
/// first write.
pub fn open_index(path: &Path) -> Result<Connection, SchemaError> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(Connection::open(path)?)
}

/// Open an empty in-memory parts index without tables.
pub fn open_index_memory() -> Result<Connection, SchemaError> {
    Ok(Connection::open_in_memory()?)
}

/// Whether a table (or virtual table) named `name` exists.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

const SOURCE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS manufacturers (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY NOT NULL,
    category TEXT NOT NULL,
    subcategory TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS components (
    lcsc INTEGER PRIMARY KEY NOT NULL,
    category_id INTEGER NOT NULL,
    mfr TEXT NOT NULL,
    package TEXT NOT NULL,
    joints INTEGER NOT NULL,
    manufacturer_id INTEGER NOT NULL,
    basic INTEGER NOT NULL,
    preferred INTEGER NOT NULL DEFAULT 0,
    description TEXT NOT NULL,
    datasheet TEXT NOT NULL,
    stock INTEGER NOT NULL,
    price TEXT,
    last_update INTEGER NOT NULL DEFAULT 0,
    extra TEXT,
    last_on_stock INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS components_category ON components (category_id);
CREATE INDEX IF NOT EXISTS components_manufacturer ON components (manufacturer_id);
"#;

// Columns that are useless as search tokens are unindexed to keep the FTS5
// index small.
const INDEX_SCHEMA_SQL: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS parts USING fts5 (
    'LCSC Part',
    'First Category',
    'Second Category',
    'MFR.Part',
    'Package',
    'Solder Joint' UNINDEXED,
    'Manufacturer',
    'Library Type',
    'Description',
    'Datasheet' UNINDEXED,
    'Price' UNINDEXED,
    'Stock' UNINDEXED,
    tokenize = "trigram"
);

CREATE TABLE IF NOT EXISTS mapping (
    'footprint',
    'value',
    'LCSC'
);

CREATE TABLE IF NOT EXISTS meta (
    'filename',
    'size',
    'partcount',
    'date',
    'last_update'
);

CREATE TABLE IF NOT EXISTS categories (
    'First Category',
    'Second Category'
);
"#;
