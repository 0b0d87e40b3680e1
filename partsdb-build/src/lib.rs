//! Build the full-text parts index from the inventory cache.
//!
//! This crate owns the conversion pipeline: it streams components out of a
//! [`ComponentStore`](partsdb_catalog::ComponentStore), translates them, and
//! writes the parts, the category index, and the run metadata into a
//! [`SearchIndexStore`](partsdb_catalog::SearchIndexStore).

pub mod generate;
pub mod progress;
pub mod settings;
pub mod variant;

pub use generate::{
    DEFAULT_BATCH_SIZE, Generate, GenerateError, GenerateReport, GenerateState, TranslatorSlot,
};
pub use progress::{GenerateProgress, LogProgress, SilentProgress};
pub use settings::{
    BuildSettings, SettingsError, load_settings, read_settings, save_settings, settings_path,
};
pub use variant::{
    BuildError, DEFAULT_CURRENT_THRESHOLD_DAYS, IndexVariant, UnknownVariant, build_variant,
};
