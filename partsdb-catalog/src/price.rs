//! Quantity-break price lists.
//!
//! The inventory cache stores prices as a JSON array of breaks:
//! ```text
//! [{"qFrom": 1, "qTo": 9, "price": 0.0123}, {"qFrom": 10, "qTo": null, "price": 0.0101}]
//! ```
//! Breaks are ordered from the smallest quantity (highest unit price) to the
//! largest. The index stores a compact form of the same list:
//! ```text
//! 1-9:0.012,10-:0.010
//! ```
//! produced by [`normalize_prices`] followed by [`format_price_list`].

use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Number of fractional digits kept by [`reduce_precision`].
pub const PRICE_PRECISION: u32 = 3;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("price data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("invalid price: {0}")]
    InvalidPrice(String),
    #[error("malformed price token: '{0}'")]
    MalformedToken(String),
}

/// Breaks priced below one cent are not worth keeping past the first.
pub fn default_price_cutoff() -> Decimal {
    Decimal::new(1, 2)
}

// ── PriceEntry ──────────────────────────────────────────────────────────────

/// Price for one quantity range. `max_quantity == None` means open-ended.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceEntry {
    pub min_quantity: u64,
    pub max_quantity: Option<u64>,
    value: Decimal,
    /// Exact textual price, kept to avoid float formatting artefacts.
    price_text: String,
    price: f64,
}

impl PriceEntry {
    pub fn new(
        min_quantity: u64,
        max_quantity: Option<u64>,
        price: &str,
    ) -> Result<Self, PriceError> {
        let text = price.trim();
        let value = Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|_| PriceError::InvalidPrice(price.to_string()))?;
        Ok(Self {
            min_quantity,
            max_quantity,
            value,
            price_text: text.to_string(),
            price: parse_float(text),
        })
    }

    fn from_decimal(min_quantity: u64, max_quantity: Option<u64>, value: Decimal) -> Self {
        let price_text = value.to_string();
        Self {
            min_quantity,
            max_quantity,
            value,
            price: parse_float(&price_text),
            price_text,
        }
    }

    pub fn price_text(&self) -> &str {
        &self.price_text
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn value(&self) -> Decimal {
        self.value
    }
}

impl fmt::Display for PriceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-", self.min_quantity)?;
        if let Some(max) = self.max_quantity {
            write!(f, "{max}")?;
        }
        write!(f, ":{}", self.price_text)
    }
}

// Text is validated as a decimal before it gets here.
fn parse_float(text: &str) -> f64 {
    text.parse().unwrap_or_default()
}

// ── Normalization stages ────────────────────────────────────────────────────

/// Round every price to [`PRICE_PRECISION`] digits (midpoint to even) and
/// render it with exactly that many fractional digits.
pub fn reduce_precision(entries: Vec<PriceEntry>) -> Vec<PriceEntry> {
    entries
        .into_iter()
        .map(|entry| {
            let mut rounded = entry
                .value
                .round_dp_with_strategy(PRICE_PRECISION, RoundingStrategy::MidpointNearestEven);
            rounded.rescale(PRICE_PRECISION);
            PriceEntry::from_decimal(entry.min_quantity, entry.max_quantity, rounded)
        })
        .collect()
}

/// Drop every break after the first whose price is below `cutoff`.
///
/// The first break is always kept, and whatever break ends up last becomes
/// open-ended since it now covers every larger quantity.
pub fn filter_below_cutoff(entries: Vec<PriceEntry>, cutoff: Decimal) -> Vec<PriceEntry> {
    let mut entries = entries.into_iter();
    let Some(first) = entries.next() else {
        return Vec::new();
    };

    let mut kept = vec![first];
    kept.extend(entries.filter(|entry| entry.value >= cutoff));

    if let Some(last) = kept.last_mut() {
        last.max_quantity = None;
    }
    kept
}

/// Merge runs of consecutive breaks with the same price text into one break
/// spanning the whole run. Equal prices separated by a different price are
/// left alone.
pub fn filter_duplicate_prices(entries: Vec<PriceEntry>) -> Vec<PriceEntry> {
    let capacity = entries.len();
    entries
        .into_iter()
        .fold(Vec::with_capacity(capacity), |mut merged: Vec<PriceEntry>, entry| {
            match merged.last_mut() {
                Some(run) if run.price_text == entry.price_text => {
                    run.max_quantity = entry.max_quantity;
                }
                _ => merged.push(entry),
            }
            merged
        })
}

/// Counts of breaks seen and removed while normalizing price lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceStats {
    pub entries: u64,
    pub cutoff_removed: u64,
    pub duplicates_removed: u64,
}

impl PriceStats {
    /// All removed breaks, duplicates included.
    pub fn removed(&self) -> u64 {
        self.cutoff_removed + self.duplicates_removed
    }

    pub fn removed_percent(&self) -> f64 {
        if self.entries == 0 {
            0.0
        } else {
            self.removed() as f64 / self.entries as f64 * 100.0
        }
    }
}

impl AddAssign for PriceStats {
    fn add_assign(&mut self, other: Self) {
        self.entries += other.entries;
        self.cutoff_removed += other.cutoff_removed;
        self.duplicates_removed += other.duplicates_removed;
    }
}

/// Run all three stages in order: precision, cutoff, duplicates.
///
/// Duplicates are detected on rounded prices, and cheap breaks are removed
/// before merging so they never widen a surviving break.
pub fn normalize_prices(entries: Vec<PriceEntry>, cutoff: Decimal) -> (Vec<PriceEntry>, PriceStats) {
    let rounded = reduce_precision(entries);
    let total = rounded.len();

    let above_cutoff = filter_below_cutoff(rounded, cutoff);
    let after_cutoff = above_cutoff.len();

    let unique = filter_duplicate_prices(above_cutoff);

    let stats = PriceStats {
        entries: total as u64,
        cutoff_removed: (total - after_cutoff) as u64,
        duplicates_removed: (after_cutoff - unique.len()) as u64,
    };
    (unique, stats)
}

// ── Serialization ───────────────────────────────────────────────────────────

/// Render the compact `min-max:price` list stored in the index.
pub fn format_price_list(entries: &[PriceEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a string produced by [`format_price_list`].
pub fn parse_price_list(serialized: &str) -> Result<Vec<PriceEntry>, PriceError> {
    if serialized.is_empty() {
        return Ok(Vec::new());
    }

    serialized
        .split(',')
        .map(|token| {
            let malformed = || PriceError::MalformedToken(token.to_string());
            let (range, price) = token.split_once(':').ok_or_else(malformed)?;
            let (min, max) = range.split_once('-').ok_or_else(malformed)?;
            let min = min.parse().map_err(|_| malformed())?;
            let max = if max.is_empty() {
                None
            } else {
                Some(max.parse().map_err(|_| malformed())?)
            };
            PriceEntry::new(min, max, price)
        })
        .collect()
}

/// One break as stored in the inventory cache.
#[derive(Debug, Deserialize)]
struct RawPriceBreak {
    #[serde(rename = "qFrom")]
    q_from: Value,
    #[serde(rename = "qTo", default)]
    q_to: Option<Value>,
    price: Value,
}

/// Parse the JSON price payload of a component. A missing or `null` payload
/// is an empty list.
pub fn parse_price_payload(payload: Option<&str>) -> Result<Vec<PriceEntry>, PriceError> {
    let payload = match payload.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(p) => p,
    };

    let breaks: Option<Vec<RawPriceBreak>> = serde_json::from_str(payload)?;
    breaks
        .unwrap_or_default()
        .into_iter()
        .map(|raw| {
            let min = quantity(&raw.q_from)?;
            let max = match &raw.q_to {
                None | Some(Value::Null) => None,
                Some(v) => Some(quantity(v)?),
            };
            let price = match &raw.price {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                other => return Err(PriceError::InvalidPrice(other.to_string())),
            };
            PriceEntry::new(min, max, &price)
        })
        .collect()
}

fn quantity(value: &Value) -> Result<u64, PriceError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| PriceError::InvalidQuantity(value.to_string()))
}

#[cfg(test)]
#[path = "tests/price_tests.rs"]
mod tests;
