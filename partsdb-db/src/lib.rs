//! SQLite persistence for the parts pipeline.
//!
//! Reads the inventory cache (`components`, `manufacturers`, `categories`)
//! and writes the FTS5 parts index served to the design tool. Both sides are
//! exposed through the `partsdb-catalog` store traits.

pub mod index;
pub mod operations;
pub mod queries;
pub mod schema;
pub mod source;

pub use index::SqlitePartsIndex;
pub use operations::{
    OperationError, insert_category, insert_category_index, insert_component,
    insert_manufacturer, insert_parts, optimize_index, write_run_metadata,
};
pub use queries::{
    IndexStats, count_components, distinct_part_categories, fetch_component_page,
    filter_clause, index_stats, list_categories, load_categories, load_manufacturers,
    part_count, read_run_metadata, search_parts,
};
pub use schema::{
    SchemaError, create_index_schema, create_source_schema, open_index, open_index_memory,
    open_source, open_source_memory,
};
pub use source::SqliteComponentStore;
