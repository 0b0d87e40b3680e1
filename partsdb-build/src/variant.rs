//! Named index variants and the one-call build of a variant to disk.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Utc;
use partsdb_catalog::{ComponentFilter, ComponentStore, FilterCondition};
use partsdb_db::{SchemaError, SqlitePartsIndex};
use thiserror::Error;

use crate::generate::{Generate, GenerateError, GenerateReport};
use crate::progress::GenerateProgress;
use crate::settings::BuildSettings;

/// Obsolescence threshold of the `current` variant when none is configured.
pub const DEFAULT_CURRENT_THRESHOLD_DAYS: u32 = 365;

/// A preset filter plus the file it is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexVariant {
    /// Basic and preferred library parts only.
    Basic,
    All,
    /// Everything except parts that have been out of stock for too long.
    Current,
    /// Schema only, no parts. Used to debug the consumer.
    Empty,
}

#[derive(Debug, Error)]
#[error("Unknown index variant '{0}' (expected basic, all, current or empty)")]
pub struct UnknownVariant(pub String);

impl IndexVariant {
    pub const VARIANTS: [IndexVariant; 4] = [
        IndexVariant::Basic,
        IndexVariant::All,
        IndexVariant::Current,
        IndexVariant::Empty,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndexVariant::Basic => "basic",
            IndexVariant::All => "all",
            IndexVariant::Current => "current",
            IndexVariant::Empty => "empty",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            IndexVariant::Basic => "parts-basic-fts5.db",
            IndexVariant::All => "parts-fts5.db",
            IndexVariant::Current => "parts-current-fts5.db",
            IndexVariant::Empty => "parts-empty-fts5.db",
        }
    }

    /// Filter for this variant. `obsolete_days` applies to every variant
    /// except `empty`; `current` falls back to
    /// [`DEFAULT_CURRENT_THRESHOLD_DAYS`] when it is 0.
    pub fn filter(&self, obsolete_days: u32, now: i64) -> ComponentFilter {
        match self {
            IndexVariant::Basic => ComponentFilter::all()
                .with(FilterCondition::BasicOrPreferred)
                .not_obsolete_for(obsolete_days, now),
            IndexVariant::All => ComponentFilter::all().not_obsolete_for(obsolete_days, now),
            IndexVariant::Current => {
                let days = if obsolete_days == 0 {
                    DEFAULT_CURRENT_THRESHOLD_DAYS
                } else {
                    obsolete_days
                };
                ComponentFilter::all().not_obsolete_for(days, now)
            }
            IndexVariant::Empty => ComponentFilter::nothing(),
        }
    }
}

impl fmt::Display for IndexVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndexVariant::VARIANTS
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Build `variant` from `source` into a fresh file under
/// `settings.output_dir`. Returns the path written and the run report.
pub fn build_variant(
    source: &dyn ComponentStore,
    variant: IndexVariant,
    settings: &BuildSettings,
    progress: &dyn GenerateProgress,
) -> Result<(PathBuf, GenerateReport), BuildError> {
    std::fs::create_dir_all(&settings.output_dir)?;
    let path = settings.output_dir.join(variant.file_name());
    log::debug!("Building {} index at {}", variant, path.display());

    let mut index = SqlitePartsIndex::create(&path)?;
    let filter = variant.filter(settings.obsolete_parts_threshold_days, Utc::now().timestamp());
    let report = Generate::new(source, &mut index, progress)
        .batch_size(settings.batch_size)
        .price_cutoff(settings.price_cutoff)
        .generate(&filter)?;

    Ok((path, report))
}
