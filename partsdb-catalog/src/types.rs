//! Data model types for the parts pipeline.
//!
//! `RawComponent` rows come from the inventory cache, `CanonicalPart` and
//! `CategoryIndexRow` rows go into the search index, and `RunMetadata`
//! describes one finished build.

use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Manufacturer id to display name.
pub type ManufacturerTable = HashMap<i64, String>;

/// Category id to `(first category, second category)`.
pub type CategoryTable = HashMap<i64, (String, String)>;

/// Marker prepended to the numeric LCSC id in the index.
pub const LCSC_PREFIX: char = 'C';

// ── Source rows ─────────────────────────────────────────────────────────────

/// One row of the inventory cache, as read. Never mutated by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawComponent {
    pub lcsc: i64,
    pub category_id: i64,
    pub manufacturer_id: i64,
    /// Manufacturer part number.
    pub mfr: String,
    pub package: String,
    pub joints: i64,
    pub basic: bool,
    pub preferred: bool,
    pub description: String,
    pub datasheet: String,
    pub stock: i64,
    /// Serialized JSON price breaks.
    pub price: Option<String>,
    /// Serialized JSON metadata, may carry a better description.
    pub extra: Option<String>,
    /// Unix timestamp of the last time the part was seen in stock.
    pub last_on_stock: i64,
}

// ── Index rows ──────────────────────────────────────────────────────────────

/// Sourcing tier of a part. The design tool warns on anything but `Basic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LibraryType {
    Basic,
    Preferred,
    Extended,
}

impl LibraryType {
    /// `basic` wins over `preferred` when a row sets both.
    pub fn from_flags(basic: bool, preferred: bool) -> Self {
        if basic {
            LibraryType::Basic
        } else if preferred {
            LibraryType::Preferred
        } else {
            LibraryType::Extended
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryType::Basic => "Basic",
            LibraryType::Preferred => "Preferred",
            LibraryType::Extended => "Extended",
        }
    }

    /// Parse the label stored in the index.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Basic" => Some(LibraryType::Basic),
            "Preferred" => Some(LibraryType::Preferred),
            "Extended" => Some(LibraryType::Extended),
            _ => None,
        }
    }
}

impl fmt::Display for LibraryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the full-text parts table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPart {
    pub lcsc_part: String,
    pub first_category: String,
    pub second_category: String,
    pub mfr_part: String,
    pub package: String,
    pub solder_joints: i64,
    pub manufacturer: String,
    pub library_type: LibraryType,
    pub description: String,
    pub datasheet: String,
    /// Compact price list, see [`crate::price::format_price_list`].
    pub price: String,
    pub stock: String,
}

impl CanonicalPart {
    /// Column names of the parts table, in insertion order.
    pub const COLUMNS: [&'static str; 12] = [
        "LCSC Part",
        "First Category",
        "Second Category",
        "MFR.Part",
        "Package",
        "Solder Joint",
        "Manufacturer",
        "Library Type",
        "Description",
        "Datasheet",
        "Price",
        "Stock",
    ];

    pub fn category(&self) -> CategoryIndexRow {
        CategoryIndexRow::new(&self.first_category, &self.second_category)
    }
}

/// A distinct `(first, second)` category pair, used by the UI for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryIndexRow {
    pub first_category: String,
    pub second_category: String,
}

impl CategoryIndexRow {
    pub fn new(first: &str, second: &str) -> Self {
        Self {
            first_category: first.to_string(),
            second_category: second.to_string(),
        }
    }

    /// Sort order of the categories table: case-insensitive by first, then
    /// second category. Ties fall back to the exact text so the order is total.
    pub fn cmp_display(&self, other: &Self) -> std::cmp::Ordering {
        let key = |row: &Self| {
            (
                row.first_category.to_ascii_uppercase(),
                row.second_category.to_ascii_uppercase(),
            )
        };
        key(self).cmp(&key(other)).then_with(|| self.cmp(other))
    }
}

/// Sort rows into the order the categories table is written in.
pub fn sort_categories(rows: &mut [CategoryIndexRow]) {
    rows.sort_by(|a, b| a.cmp_display(b));
}

/// Description of one finished build, stored in the `meta` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMetadata {
    /// Name of the inventory database the index was built from.
    pub source_name: String,
    /// Size of the built index in bytes.
    pub size_bytes: u64,
    pub part_count: u64,
    pub date: NaiveDate,
    pub last_update: NaiveDateTime,
}

impl RunMetadata {
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";
    pub const TIMESTAMP_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S%.6f";

    pub fn date_string(&self) -> String {
        self.date.format(Self::DATE_FORMAT).to_string()
    }

    pub fn last_update_string(&self) -> String {
        self.last_update.format(Self::TIMESTAMP_FORMAT).to_string()
    }
}

// ── Filters ─────────────────────────────────────────────────────────────────

/// One condition a component must satisfy to be included in a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCondition {
    /// `stock > 0`.
    InStock,
    /// Basic or preferred library parts only.
    BasicOrPreferred,
    /// Drop parts with zero stock that were last in stock before `cutoff`
    /// (unix seconds).
    NotObsoleteSince { cutoff: i64 },
    /// Matches nothing. Used to build an empty index.
    Nothing,
}

impl FilterCondition {
    pub fn matches(&self, component: &RawComponent) -> bool {
        match self {
            FilterCondition::InStock => component.stock > 0,
            FilterCondition::BasicOrPreferred => component.basic || component.preferred,
            FilterCondition::NotObsoleteSince { cutoff } => {
                !(component.stock == 0 && component.last_on_stock < *cutoff)
            }
            FilterCondition::Nothing => false,
        }
    }
}

/// A conjunction of [`FilterCondition`]s. The empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentFilter {
    conditions: Vec<FilterCondition>,
}

impl ComponentFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn nothing() -> Self {
        Self::all().with(FilterCondition::Nothing)
    }

    /// Exclude parts that have had no stock for more than `days` days as of
    /// `now` (unix seconds). `days == 0` disables the condition.
    pub fn not_obsolete_for(self, days: u32, now: i64) -> Self {
        if days == 0 {
            return self;
        }
        let cutoff = now - i64::from(days) * 24 * 60 * 60;
        self.with(FilterCondition::NotObsoleteSince { cutoff })
    }

    pub fn with(mut self, condition: FilterCondition) -> Self {
        if !self.conditions.contains(&condition) {
            self.conditions.push(condition);
        }
        self
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, component: &RawComponent) -> bool {
        self.conditions.iter().all(|c| c.matches(component))
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
