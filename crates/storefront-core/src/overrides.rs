//! Static price overrides keyed by exact product title.
//!
//! Used only when live pricing cannot be resolved in time. The built-in
//! table can be replaced wholesale by a YAML file:
//!
//! ```yaml
//! prices:
//!   "Matte Lipstick Collection":
//!     amount: 8500
//!     currency: NGN
//!     formatted: "₦8,500"
//!   "Foundation Pro Max":
//!     amount: 12000
//!     currency: NGN
//!     originalPrice: 15000
//! ```
//!
//! `formatted` may be omitted, in which case it is derived from `amount`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::money::format_amount;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceOverride {
    pub amount: f64,
    pub currency: String,
    pub formatted: String,
    #[serde(default, alias = "original_price")]
    pub original_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawOverride {
    amount: f64,
    currency: String,
    #[serde(default)]
    formatted: Option<String>,
    #[serde(default, alias = "originalPrice")]
    original_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OverridesFile {
    #[serde(default)]
    prices: HashMap<String, RawOverride>,
}

/// Title → fixed price lookup.
#[derive(Debug, Clone, Default)]
pub struct PriceOverrideTable {
    entries: HashMap<String, PriceOverride>,
}

impl PriceOverrideTable {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table shipped with the storefront.
    #[must_use]
    pub fn builtin() -> Self {
        let naira = |amount: f64, formatted: &str, original_price: Option<f64>| PriceOverride {
            amount,
            currency: "NGN".to_owned(),
            formatted: formatted.to_owned(),
            original_price,
        };

        let mut entries = HashMap::new();
        entries.insert("BANANA POWDER".to_owned(), naira(12_000.0, "₦12,000", None));
        entries.insert(
            "EYES ON ME LIQUID EYELINER".to_owned(),
            naira(15_000.0, "₦15,000", None),
        );
        entries.insert(
            "Matte Lipstick Collection".to_owned(),
            naira(8_500.0, "₦8,500", None),
        );
        entries.insert(
            "Foundation Pro Max".to_owned(),
            naira(12_000.0, "₦12,000", Some(15_000.0)),
        );
        Self { entries }
    }

    pub fn insert(&mut self, title: impl Into<String>, entry: PriceOverride) {
        self.entries.insert(title.into(), entry);
    }

    /// Exact, case-sensitive title match.
    #[must_use]
    pub fn get(&self, title: &str) -> Option<&PriceOverride> {
        self.entries.get(title)
    }

    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(title)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load and validate a price override table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_price_overrides(path: &Path) -> Result<PriceOverrideTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::OverridesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_price_overrides(&content)
}

fn parse_price_overrides(content: &str) -> Result<PriceOverrideTable, ConfigError> {
    let file: OverridesFile =
        serde_yaml::from_str(content).map_err(ConfigError::OverridesFileParse)?;

    let mut table = PriceOverrideTable::empty();
    for (title, raw) in file.prices {
        validate_override(&title, &raw)?;
        let currency = raw.currency.trim().to_ascii_uppercase();
        let formatted = raw
            .formatted
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| format_amount(raw.amount, &currency));
        table.insert(
            title,
            PriceOverride {
                amount: raw.amount,
                currency,
                formatted,
                original_price: raw.original_price,
            },
        );
    }
    Ok(table)
}

fn validate_override(title: &str, raw: &RawOverride) -> Result<(), ConfigError> {
    if title.trim().is_empty() {
        return Err(ConfigError::Validation(
            "product title must be non-empty".to_string(),
        ));
    }
    if !raw.amount.is_finite() || raw.amount < 0.0 {
        return Err(ConfigError::Validation(format!(
            "'{title}' has invalid amount {}; must be a non-negative number",
            raw.amount
        )));
    }
    if let Some(original) = raw.original_price {
        if !original.is_finite() || original < 0.0 {
            return Err(ConfigError::Validation(format!(
                "'{title}' has invalid originalPrice {original}"
            )));
        }
    }
    if raw.currency.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "'{title}' must name a currency"
        )));
    }
    Ok(())
}
