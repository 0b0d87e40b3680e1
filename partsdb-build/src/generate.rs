//! The conversion pipeline from the inventory cache to the parts index.
//!
//! A [`Generate`] value runs once: `Created → Running → Completed`, or
//! `Failed` on the first error. Each batch is written in one transaction, so
//! a failed run leaves the batches before the failing one in the index. The
//! index must then be discarded and rebuilt from scratch.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use partsdb_catalog::{
    CanonicalPart, ComponentFilter, ComponentStore, ComponentTranslator, PriceStats, RunMetadata,
    SearchIndexStore, StoreError, TranslateError, default_price_cutoff, sort_categories,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::progress::GenerateProgress;

/// Rows per fetched and inserted batch.
pub const DEFAULT_BATCH_SIZE: usize = 100_000;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Batch {batch}: {source}")]
    Translate {
        batch: usize,
        #[source]
        source: TranslateError,
    },
    #[error("Component store error: {0}")]
    Source(#[source] StoreError),
    #[error("Parts index error: {0}")]
    Destination(#[source] StoreError),
    #[error("Pipeline cannot start from state {0}")]
    InvalidState(GenerateState),
    #[error("Batch size must be at least 1")]
    ZeroBatchSize,
}

impl GenerateError {
    /// LCSC number of the row that failed translation, if that was the cause.
    pub fn lcsc(&self) -> Option<i64> {
        match self {
            GenerateError::Translate { source, .. } => Some(source.lcsc()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateState {
    Created,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for GenerateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerateState::Created => "created",
            GenerateState::Running => "running",
            GenerateState::Completed => "completed",
            GenerateState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The translator of a run. `NotBuilt` is filled from the component store's
/// lookup tables when the run starts.
#[derive(Debug, Clone)]
pub enum TranslatorSlot {
    NotBuilt,
    Ready(ComponentTranslator),
}

/// Counts gathered by one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateReport {
    pub total_components: u64,
    pub loaded_components: u64,
    pub batches: usize,
    pub part_count: u64,
    pub category_count: u64,
    pub price: PriceStats,
}

impl GenerateReport {
    /// Price filtering summary, e.g.
    /// `Price value filtering trimmed 3 (including 1 duplicates) out of 10 entries 30.00%`.
    pub fn summary(&self) -> String {
        format!(
            "Price value filtering trimmed {} (including {} duplicates) out of {} entries {:.2}%",
            self.price.removed(),
            self.price.duplicates_removed,
            self.price.entries,
            self.price.removed_percent()
        )
    }
}

/// One run of the pipeline against a source and a fresh destination.
pub struct Generate<'a> {
    source: &'a dyn ComponentStore,
    index: &'a mut dyn SearchIndexStore,
    progress: &'a dyn GenerateProgress,
    translator: TranslatorSlot,
    price_cutoff: Decimal,
    batch_size: usize,
    built_at: Option<NaiveDateTime>,
    state: GenerateState,
    total_components: u64,
    loaded_components: u64,
}

impl<'a> Generate<'a> {
    /// Create a run whose translator is built from the source's lookup tables.
    pub fn new(
        source: &'a dyn ComponentStore,
        index: &'a mut dyn SearchIndexStore,
        progress: &'a dyn GenerateProgress,
    ) -> Self {
        Self {
            source,
            index,
            progress,
            translator: TranslatorSlot::NotBuilt,
            price_cutoff: default_price_cutoff(),
            batch_size: DEFAULT_BATCH_SIZE,
            built_at: None,
            state: GenerateState::Created,
            total_components: 0,
            loaded_components: 0,
        }
    }

    /// Create a run with a prepared translator. Its price cutoff is used as is.
    pub fn with_translator(
        source: &'a dyn ComponentStore,
        index: &'a mut dyn SearchIndexStore,
        progress: &'a dyn GenerateProgress,
        translator: ComponentTranslator,
    ) -> Self {
        let price_cutoff = translator.price_cutoff();
        Self {
            translator: TranslatorSlot::Ready(translator),
            price_cutoff,
            ..Self::new(source, index, progress)
        }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Price cutoff for a translator built by the run.
    pub fn price_cutoff(mut self, cutoff: Decimal) -> Self {
        self.price_cutoff = cutoff;
        self
    }

    /// Fix the build timestamp instead of reading the local clock.
    pub fn built_at(mut self, timestamp: NaiveDateTime) -> Self {
        self.built_at = Some(timestamp);
        self
    }

    pub fn state(&self) -> GenerateState {
        self.state
    }

    pub fn total_components(&self) -> u64 {
        self.total_components
    }

    pub fn loaded_components(&self) -> u64 {
        self.loaded_components
    }

    pub fn translator(&self) -> Option<&ComponentTranslator> {
        match &self.translator {
            TranslatorSlot::NotBuilt => None,
            TranslatorSlot::Ready(translator) => Some(translator),
        }
    }

    /// Run the pipeline for the components matching `filter`.
    pub fn generate(&mut self, filter: &ComponentFilter) -> Result<GenerateReport, GenerateError> {
        if self.state != GenerateState::Created {
            return Err(GenerateError::InvalidState(self.state));
        }
        if self.batch_size == 0 {
            return Err(GenerateError::ZeroBatchSize);
        }

        self.state = GenerateState::Running;
        match self.run(filter) {
            Ok(report) => {
                self.state = GenerateState::Completed;
                Ok(report)
            }
            Err(e) => {
                self.state = GenerateState::Failed;
                Err(e)
            }
        }
    }

    fn ensure_translator(&mut self) -> Result<(), GenerateError> {
        if let TranslatorSlot::NotBuilt = self.translator {
            self.progress.on_phase("Reading manufacturers");
            let manufacturers = self.source.manufacturers().map_err(GenerateError::Source)?;
            self.progress.on_phase("Reading categories");
            let categories = self.source.categories().map_err(GenerateError::Source)?;
            log::debug!(
                "Loaded {} manufacturers and {} categories",
                manufacturers.len(),
                categories.len()
            );
            self.translator = TranslatorSlot::Ready(
                ComponentTranslator::new(manufacturers, categories)
                    .with_price_cutoff(self.price_cutoff),
            );
        }
        Ok(())
    }

    fn run(&mut self, filter: &ComponentFilter) -> Result<GenerateReport, GenerateError> {
        self.ensure_translator()?;
        let TranslatorSlot::Ready(translator) = &self.translator else {
            return Err(GenerateError::InvalidState(self.state));
        };
        let store = self.source;

        self.total_components = store.count(filter).map_err(GenerateError::Source)?;
        self.progress
            .on_phase(&format!("{} parts to import", self.total_components));

        self.index.create_schema().map_err(GenerateError::Destination)?;

        let mut price = PriceStats::default();
        let mut batches = 0;
        let pages = store
            .fetch(filter, self.batch_size)
            .map_err(GenerateError::Source)?;
        for page in pages {
            let page = page.map_err(GenerateError::Source)?;
            batches += 1;

            let mut parts: Vec<CanonicalPart> = Vec::with_capacity(page.len());
            let mut batch_price = PriceStats::default();
            for raw in &page {
                let translation = translator
                    .translate(raw)
                    .map_err(|source| GenerateError::Translate {
                        batch: batches,
                        source,
                    })?;
                batch_price += translation.price_stats;
                parts.push(translation.part);
            }

            self.index
                .insert_batch(&parts)
                .map_err(GenerateError::Destination)?;
            price += batch_price;
            self.loaded_components += parts.len() as u64;
            log::debug!("Batch {} wrote {} parts", batches, parts.len());
            self.progress
                .on_batch(self.loaded_components, self.total_components);
        }

        self.progress.on_phase("Populating categories");
        let mut categories = self
            .index
            .distinct_categories()
            .map_err(GenerateError::Destination)?;
        sort_categories(&mut categories);
        self.index
            .insert_category_index(&categories)
            .map_err(GenerateError::Destination)?;

        self.progress.on_phase("Optimizing full-text index");
        self.index.optimize().map_err(GenerateError::Destination)?;

        let part_count = self.index.part_count().map_err(GenerateError::Destination)?;
        let now = self.built_at.unwrap_or_else(|| Local::now().naive_local());
        let metadata = RunMetadata {
            source_name: store.name().to_string(),
            size_bytes: self.index.size_bytes().map_err(GenerateError::Destination)?,
            part_count,
            date: now.date(),
            last_update: now,
        };
        self.index
            .write_run_metadata(&metadata)
            .map_err(GenerateError::Destination)?;

        let report = GenerateReport {
            total_components: self.total_components,
            loaded_components: self.loaded_components,
            batches,
            part_count,
            category_count: categories.len() as u64,
            price,
        };
        log::info!("{}", report.summary());
        self.progress.on_complete(&format!(
            "Loaded {} parts in {} batches",
            report.loaded_components, report.batches
        ));

        Ok(report)
    }
}
