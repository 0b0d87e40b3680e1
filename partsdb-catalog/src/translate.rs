//! Translation of raw inventory rows into parts index rows.
//!
//! Translation is pure: lookups come from the manufacturer and category tables
//! handed to [`ComponentTranslator::new`], and nothing here touches a database.

use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;

use crate::price::{self, PriceError, PriceStats};
use crate::types::{
    CanonicalPart, CategoryTable, LCSC_PREFIX, LibraryType, ManufacturerTable, RawComponent,
};

/// Metadata keys that may carry a better description, in priority order.
const DESCRIPTION_KEYS: [&str; 2] = ["description", "describe"];

/// Compliance token. Its absence is flagged with [`NON_COMPLIANT_MARKER`].
const COMPLIANCE_TOKEN: &str = " ROHS";
const NON_COMPLIANT_MARKER: &str = "not ROHS";

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("C{lcsc}: unknown manufacturer id {manufacturer_id}")]
    MissingManufacturer { lcsc: i64, manufacturer_id: i64 },
    #[error("C{lcsc}: unknown category id {category_id}")]
    MissingCategory { lcsc: i64, category_id: i64 },
    #[error("C{lcsc}: {source}")]
    Price {
        lcsc: i64,
        #[source]
        source: PriceError,
    },
}

impl TranslateError {
    /// LCSC number of the row that failed.
    pub fn lcsc(&self) -> i64 {
        match self {
            TranslateError::MissingManufacturer { lcsc, .. }
            | TranslateError::MissingCategory { lcsc, .. }
            | TranslateError::Price { lcsc, .. } => *lcsc,
        }
    }
}

/// A translated row together with its price normalization counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub part: CanonicalPart,
    pub price_stats: PriceStats,
}

/// Translates raw components using lookup tables read once per build.
#[derive(Debug, Clone)]
pub struct ComponentTranslator {
    manufacturers: ManufacturerTable,
    categories: CategoryTable,
    price_cutoff: Decimal,
}

impl ComponentTranslator {
    pub fn new(manufacturers: ManufacturerTable, categories: CategoryTable) -> Self {
        Self {
            manufacturers,
            categories,
            price_cutoff: price::default_price_cutoff(),
        }
    }

    pub fn with_price_cutoff(mut self, cutoff: Decimal) -> Self {
        self.price_cutoff = cutoff;
        self
    }

    pub fn manufacturers(&self) -> &ManufacturerTable {
        &self.manufacturers
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn price_cutoff(&self) -> Decimal {
        self.price_cutoff
    }

    pub fn translate(&self, raw: &RawComponent) -> Result<Translation, TranslateError> {
        let manufacturer = self.manufacturers.get(&raw.manufacturer_id).ok_or(
            TranslateError::MissingManufacturer {
                lcsc: raw.lcsc,
                manufacturer_id: raw.manufacturer_id,
            },
        )?;
        let (first_category, second_category) =
            self.categories
                .get(&raw.category_id)
                .ok_or(TranslateError::MissingCategory {
                    lcsc: raw.lcsc,
                    category_id: raw.category_id,
                })?;

        let entries = price::parse_price_payload(raw.price.as_deref()).map_err(|source| {
            TranslateError::Price {
                lcsc: raw.lcsc,
                source,
            }
        })?;
        let (entries, price_stats) = price::normalize_prices(entries, self.price_cutoff);

        let description = resolve_description(&raw.description, raw.extra.as_deref());
        let description = clean_description(&description, second_category, &raw.package);

        let part = CanonicalPart {
            lcsc_part: format!("{LCSC_PREFIX}{}", raw.lcsc),
            first_category: first_category.clone(),
            second_category: second_category.clone(),
            mfr_part: raw.mfr.clone(),
            package: raw.package.clone(),
            solder_joints: raw.joints,
            manufacturer: manufacturer.clone(),
            library_type: LibraryType::from_flags(raw.basic, raw.preferred),
            description,
            datasheet: raw.datasheet.clone(),
            price: price::format_price_list(&entries),
            stock: raw.stock.to_string(),
        };

        Ok(Translation { part, price_stats })
    }
}

/// Translate one row against explicit lookup tables.
pub fn translate(
    raw: &RawComponent,
    manufacturers: &ManufacturerTable,
    categories: &CategoryTable,
) -> Result<CanonicalPart, TranslateError> {
    ComponentTranslator::new(manufacturers.clone(), categories.clone())
        .translate(raw)
        .map(|t| t.part)
}

// ── Description heuristics ──────────────────────────────────────────────────

/// Pick the description: a non-empty string under one of the metadata keys
/// wins over the raw description. Unparseable metadata is ignored.
pub fn resolve_description(description: &str, extra: Option<&str>) -> String {
    let Some(extra) = extra else {
        return description.to_string();
    };
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(extra) else {
        return description.to_string();
    };

    DESCRIPTION_KEYS
        .iter()
        .find_map(|key| match map.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_else(|| description.to_string())
}

/// Compliance is the default: drop the bare token, and flag descriptions
/// that lack it. Descriptions already flagged are returned unchanged.
pub fn normalize_compliance(description: &str) -> String {
    let lower = description.to_ascii_lowercase();
    if lower.contains(&NON_COMPLIANT_MARKER.to_ascii_lowercase()) {
        return description.to_string();
    }
    if lower.contains(&COMPLIANCE_TOKEN.to_ascii_lowercase()) {
        remove_ignore_ascii_case(description, COMPLIANCE_TOKEN)
    } else {
        format!("{description} {NON_COMPLIANT_MARKER}")
    }
}

/// Remove text duplicated from the category and package columns, then
/// collapse whitespace. Repeats until nothing changes, so it is idempotent.
pub fn scrub_description(description: &str, second_category: &str, package: &str) -> String {
    let mut current = description.to_string();
    loop {
        let mut next = current.clone();
        for duplicate in [second_category, package] {
            if !duplicate.is_empty() {
                next = next.replace(duplicate, "");
            }
        }
        let next = next.split_whitespace().collect::<Vec<_>>().join(" ");
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Full cleanup applied by [`ComponentTranslator::translate`].
pub fn clean_description(description: &str, second_category: &str, package: &str) -> String {
    scrub_description(&normalize_compliance(description), second_category, package)
}

/// Remove every occurrence of an ASCII `needle`, ignoring ASCII case.
fn remove_ignore_ascii_case(text: &str, needle: &str) -> String {
    // ASCII lowercasing keeps byte offsets, so matches index into `text` too.
    let lower = text.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some(pos) = lower[cursor..].find(&needle) {
        out.push_str(&text[cursor..cursor + pos]);
        cursor += pos + needle.len();
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
#[path = "tests/translate_tests.rs"]
mod tests;
