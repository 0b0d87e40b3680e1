//! Parts catalog data model, price normalization, and component translation.
//!
//! This crate turns raw component rows from the inventory cache into the
//! compact records stored in the full-text parts index. It has no database
//! dependency: the source and destination stores are described by the traits
//! in [`store`] and implemented by `partsdb-db`.

pub mod price;
pub mod store;
pub mod translate;
pub mod types;

pub use price::{
    PRICE_PRECISION, PriceEntry, PriceError, PriceStats, default_price_cutoff,
    filter_below_cutoff, filter_duplicate_prices, format_price_list, normalize_prices,
    parse_price_list, parse_price_payload, reduce_precision,
};
pub use store::{ComponentBatches, ComponentStore, SearchIndexStore, StoreError};
pub use translate::{
    ComponentTranslator, TranslateError, Translation, clean_description, normalize_compliance,
    resolve_description, scrub_description, translate,
};
pub use types::*;
