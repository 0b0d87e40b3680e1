//! Read queries for the inventory cache and the parts index.

use chrono::{NaiveDate, NaiveDateTime};
use partsdb_catalog::{
    CanonicalPart, CategoryIndexRow, CategoryTable, ComponentFilter, FilterCondition,
    LibraryType, ManufacturerTable, RawComponent, RunMetadata,
};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};

use crate::operations::{OperationError, to_sql_int};

// ── Inventory Cache Queries ─────────────────────────────────────────────────

/// Render a filter as an SQL boolean expression over `components`.
///
/// The empty filter renders as `1`.
pub fn filter_clause(filter: &ComponentFilter) -> String {
    if filter.is_empty() {
        return "1".to_string();
    }
    filter
        .conditions()
        .iter()
        .map(|condition| match condition {
            FilterCondition::InStock => "stock > 0".to_string(),
            FilterCondition::BasicOrPreferred => "(basic = 1 OR preferred = 1)".to_string(),
            FilterCondition::NotObsoleteSince { cutoff } => {
                format!("NOT (stock = 0 AND last_on_stock < {cutoff})")
            }
            FilterCondition::Nothing => "0".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Number of components matching `filter`.
pub fn count_components(conn: &Connection, filter: &ComponentFilter) -> Result<u64, OperationError> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM components WHERE {}", filter_clause(filter)),
        [],
        |row| row.get(0),
    )?;
    Ok(count.max(0) as u64)
}

/// Up to `limit` matching components with `lcsc > after`, in `lcsc` order.
pub fn fetch_component_page(
    conn: &Connection,
    filter: &ComponentFilter,
    after: i64,
    limit: usize,
) -> Result<Vec<RawComponent>, OperationError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT lcsc, category_id, manufacturer_id, mfr, package, joints, basic, preferred,
                description, datasheet, stock, price, extra, last_on_stock
         FROM components
         WHERE lcsc > ?1 AND {}
         ORDER BY lcsc
         LIMIT ?2",
        filter_clause(filter)
    ))?;
    let rows = stmt.query_map(params![after, to_sql_int(limit as u64)], row_to_component)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// All manufacturers, keyed by id.
pub fn load_manufacturers(conn: &Connection) -> Result<ManufacturerTable, OperationError> {
    let mut stmt = conn.prepare("SELECT id, name FROM manufacturers")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;
    rows.collect::<Result<ManufacturerTable, _>>().map_err(Into::into)
}

/// All category pairs, keyed by id.
pub fn load_categories(conn: &Connection) -> Result<CategoryTable, OperationError> {
    let mut stmt = conn.prepare("SELECT id, category, subcategory FROM categories")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            (row.get::<_, String>(1)?, row.get::<_, String>(2)?),
        ))
    })?;
    rows.collect::<Result<CategoryTable, _>>().map_err(Into::into)
}

// ── Parts Index Queries ─────────────────────────────────────────────────────

/// Number of rows in the parts table.
pub fn part_count(conn: &Connection) -> Result<u64, OperationError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM parts", [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

/// Distinct category pairs present in the parts table, unordered.
pub fn distinct_part_categories(conn: &Connection) -> Result<Vec<CategoryIndexRow>, OperationError> {
    let mut stmt =
        conn.prepare(r#"SELECT DISTINCT "First Category", "Second Category" FROM parts"#)?;
    let rows = stmt.query_map([], row_to_category)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Rows of the categories table in stored order.
pub fn list_categories(conn: &Connection) -> Result<Vec<CategoryIndexRow>, OperationError> {
    let mut stmt =
        conn.prepare(r#"SELECT "First Category", "Second Category" FROM categories ORDER BY rowid"#)?;
    let rows = stmt.query_map([], row_to_category)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// The metadata row, if the build got that far.
pub fn read_run_metadata(conn: &Connection) -> Result<Option<RunMetadata>, OperationError> {
    let row = conn
        .query_row(
            "SELECT filename, size, partcount, date, last_update FROM meta LIMIT 1",
            [],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;
    let Some((source_name, size, count, date, last_update)) = row else {
        return Ok(None);
    };

    let date = NaiveDate::parse_from_str(&date, RunMetadata::DATE_FORMAT)
        .map_err(|e| OperationError::InvalidMetadata(format!("date '{date}': {e}")))?;
    let last_update = NaiveDateTime::parse_from_str(&last_update, RunMetadata::TIMESTAMP_FORMAT)
        .map_err(|e| OperationError::InvalidMetadata(format!("last_update '{last_update}': {e}")))?;

    Ok(Some(RunMetadata {
        source_name,
        size_bytes: size.max(0) as u64,
        part_count: count.max(0) as u64,
        date,
        last_update,
    }))
}

/// Full-text search over the indexed columns, best matches first.
///
/// The term is matched as a phrase. The trigram tokenizer needs at least
/// three characters to match anything.
pub fn search_parts(
    conn: &Connection,
    term: &str,
    limit: usize,
) -> Result<Vec<CanonicalPart>, OperationError> {
    let phrase = format!("\"{}\"", term.replace('"', "\"\""));
    let mut stmt = conn.prepare(
        "SELECT * FROM parts WHERE parts MATCH ?1 ORDER BY rank LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![phrase, to_sql_int(limit as u64)], row_to_part)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Summary of a built index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub parts: u64,
    pub categories: u64,
    pub basic: u64,
    pub preferred: u64,
    pub extended: u64,
    pub metadata: Option<RunMetadata>,
}

/// Gather part, tier, and category counts along with the metadata row.
pub fn index_stats(conn: &Connection) -> Result<IndexStats, OperationError> {
    let categories: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;

    let mut stats = IndexStats {
        parts: part_count(conn)?,
        categories: categories.max(0) as u64,
        basic: 0,
        preferred: 0,
        extended: 0,
        metadata: read_run_metadata(conn)?,
    };

    let mut stmt =
        conn.prepare(r#"SELECT "Library Type", COUNT(*) FROM parts GROUP BY "Library Type""#)?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
    for row in rows {
        let (label, count) = row?;
        let count = count.max(0) as u64;
        match LibraryType::from_label(&label) {
            Some(LibraryType::Basic) => stats.basic += count,
            Some(LibraryType::Preferred) => stats.preferred += count,
            Some(LibraryType::Extended) | None => stats.extended += count,
        }
    }

    Ok(stats)
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

// Scraped rows are not always complete, so text columns tolerate NULL.
fn row_to_component(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawComponent> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    let int = |idx: usize| -> rusqlite::Result<i64> {
        Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or_default())
    };
    Ok(RawComponent {
        lcsc: row.get(0)?,
        category_id: int(1)?,
        manufacturer_id: int(2)?,
        mfr: text(3)?,
        package: text(4)?,
        joints: int(5)?,
        basic: int(6)? != 0,
        preferred: int(7)? != 0,
        description: text(8)?,
        datasheet: text(9)?,
        stock: int(10)?,
        price: row.get(11)?,
        extra: row.get(12)?,
        last_on_stock: int(13)?,
    })
}

fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<CategoryIndexRow> {
    Ok(CategoryIndexRow {
        first_category: row.get(0)?,
        second_category: row.get(1)?,
    })
}

fn row_to_part(row: &rusqlite::Row<'_>) -> rusqlite::Result<CanonicalPart> {
    let label: String = row.get(7)?;
    let library_type = LibraryType::from_label(&label)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(7, label.clone(), Type::Text))?;
    Ok(CanonicalPart {
        lcsc_part: row.get(0)?,
        first_category: row.get(1)?,
        second_category: row.get(2)?,
        mfr_part: row.get(3)?,
        package: row.get(4)?,
        solder_joints: row.get(5)?,
        manufacturer: row.get(6)?,
        library_type,
        description: row.get(8)?,
        datasheet: row.get(9)?,
        price: row.get(10)?,
        stock: row.get(11)?,
    })
}
