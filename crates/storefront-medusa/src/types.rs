//! Store API response types for the commerce backend.
//!
//! ## Observed shapes
//!
//! ### List envelopes
//! Current backends wrap lists as `{"regions": [...]}` / `{"products": [...],
//! "count": N, "offset": O, "limit": L}`. Some proxies and older builds use
//! `{"data": [...]}` instead, so both keys are accepted.
//!
//! ### Variant pricing
//! Pricing is not stable across backend versions and price-list setups. A
//! variant may carry any of:
//! - `calculated_price` as a bare number,
//! - `calculated_price` as an object (`calculated_amount`, `original_amount`,
//!   `currency_code`, a nested `calculated_price.price_list_type`),
//! - `calculated_price` as a map keyed by currency code (`{"NGN": 8000}`),
//! - a legacy `prices` array of `{amount, currency_code}`,
//! - legacy scalar `price` / `original_price`,
//! - `metadata.price` set by merchandisers.
//!
//! Amounts show up as JSON numbers and as numeric strings. These fields are
//! kept as raw [`serde_json::Value`] here and classified in
//! the `shape` module, so one oddly shaped variant never fails deserialization
//! of a whole product list.
//!
//! ### Nulls
//! `countries` and `variants` have been observed as `null` on freshly
//! created records; they deserialize to empty vectors.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Response from `GET /store/regions`.
#[derive(Debug, Deserialize)]
pub struct RegionListResponse {
    #[serde(default, alias = "data", deserialize_with = "null_as_default")]
    pub regions: Vec<StoreRegion>,
}

/// Response from `GET /store/products`.
#[derive(Debug, Deserialize)]
pub struct ProductListResponse {
    #[serde(default, alias = "data", deserialize_with = "null_as_default")]
    pub products: Vec<StoreProduct>,
    /// Total matching products across all pages, when the backend reports it.
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

/// A backend region: a set of countries sharing one currency and tax setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRegion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Lowercase or uppercase ISO 4217 code, as the backend stores it.
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub automatic_taxes: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub countries: Vec<StoreCountry>,
}

impl StoreRegion {
    /// A region is usable for pricing only with both an id and a currency.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && self.currency().is_some()
    }

    /// Non-empty currency code, as stored.
    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.currency_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Lowercased ISO alpha-2 codes of the region's countries.
    pub fn country_codes(&self) -> impl Iterator<Item = String> + '_ {
        self.countries
            .iter()
            .filter_map(|c| c.iso_2.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_ascii_lowercase)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreCountry {
    #[serde(default)]
    pub iso_2: Option<String>,
    #[serde(default)]
    pub iso_3: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A catalog product. Only the fields the pricing pipeline reads are typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreProduct {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: Vec<StoreVariant>,
}

/// A purchasable SKU of a [`StoreProduct`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreVariant {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub manage_inventory: Option<bool>,
    /// Number, object, or currency-keyed map. `Null` when absent.
    #[serde(default)]
    pub calculated_price: Value,
    /// Legacy `[{amount, currency_code}]`. `Null` when absent.
    #[serde(default)]
    pub prices: Value,
    /// Legacy single price.
    #[serde(default)]
    pub price: Value,
    /// Legacy pre-discount price; some catalogs use it as the only price.
    #[serde(default)]
    pub original_price: Value,
    #[serde(default)]
    pub metadata: Value,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
