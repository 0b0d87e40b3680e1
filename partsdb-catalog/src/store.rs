//! Interfaces of the two stores the build pipeline talks to.
//!
//! `partsdb-db` implements both on SQLite. Tests implement them in memory.

use thiserror::Error;

use crate::types::{
    CanonicalPart, CategoryIndexRow, CategoryTable, ComponentFilter, ManufacturerTable,
    RawComponent, RunMetadata,
};

/// Failure inside a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Lazy, forward-only sequence of component batches.
pub type ComponentBatches<'a> = Box<dyn Iterator<Item = Result<Vec<RawComponent>, StoreError>> + 'a>;

/// Read access to the component inventory.
pub trait ComponentStore {
    /// Name recorded in the index metadata.
    fn name(&self) -> &str;

    fn count(&self, filter: &ComponentFilter) -> Result<u64, StoreError>;

    /// Stream matching components in batches of at most `batch_size` rows.
    fn fetch<'a>(
        &'a self,
        filter: &ComponentFilter,
        batch_size: usize,
    ) -> Result<ComponentBatches<'a>, StoreError>;

    fn manufacturers(&self) -> Result<ManufacturerTable, StoreError>;

    fn categories(&self) -> Result<CategoryTable, StoreError>;
}

/// Write access to a freshly created parts index.
pub trait SearchIndexStore {
    fn create_schema(&mut self) -> Result<(), StoreError>;

    /// Insert one batch atomically.
    fn insert_batch(&mut self, rows: &[CanonicalPart]) -> Result<(), StoreError>;

    /// Distinct category pairs among the rows written so far, in no
    /// particular order.
    fn distinct_categories(&self) -> Result<Vec<CategoryIndexRow>, StoreError>;

    fn insert_category_index(&mut self, rows: &[CategoryIndexRow]) -> Result<(), StoreError>;

    /// Compact the full-text index after all rows are written.
    fn optimize(&mut self) -> Result<(), StoreError>;

    fn part_count(&self) -> Result<u64, StoreError>;

    /// Current size of the index in bytes.
    fn size_bytes(&self) -> Result<u64, StoreError>;

    fn write_run_metadata(&mut self, metadata: &RunMetadata) -> Result<(), StoreError>;
}
