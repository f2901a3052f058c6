use serde::{Deserialize, Serialize};

use crate::money::format_amount;
use crate::overrides::PriceOverride;
use crate::CONTACT_FOR_PRICE;

/// Canonical price for one variant, reconciled from whichever pricing shape
/// the backend returned.
///
/// Both amounts are finite and non-negative. A variant with no discoverable
/// price has no `NormalizedPrice` at all rather than a zeroed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPrice {
    /// What the customer pays, possibly discounted.
    pub calculated_amount: f64,
    pub calculated_display: String,
    /// Pre-discount reference price. Equal to `calculated_amount` when there
    /// is no discount.
    pub original_amount: f64,
    pub original_display: String,
    /// Uppercase ISO 4217 code.
    pub currency_code: String,
    /// `"default"` unless the payload names a price list type such as `"sale"`.
    pub price_type: String,
    /// Whole-percent discount from original to calculated; never negative.
    pub percentage_diff: f64,
}

impl NormalizedPrice {
    /// Builds a record from raw amounts, filling in display strings and the
    /// discount percentage.
    #[must_use]
    pub fn new(
        calculated_amount: f64,
        original_amount: f64,
        currency_code: &str,
        price_type: &str,
    ) -> Self {
        let currency_code = currency_code.to_ascii_uppercase();
        Self {
            calculated_amount,
            calculated_display: format_amount(calculated_amount, &currency_code),
            original_amount,
            original_display: format_amount(original_amount, &currency_code),
            percentage_diff: percentage_diff(original_amount, calculated_amount),
            currency_code,
            price_type: price_type.to_owned(),
        }
    }

    /// `true` only for a sale-type price with a real, positive discount.
    #[must_use]
    pub fn is_sale(&self) -> bool {
        self.price_type == "sale" && self.percentage_diff > 0.0
    }

    /// The string a storefront shows as "the price": the discounted amount
    /// during a sale, the original amount otherwise.
    #[must_use]
    pub fn display_price(&self) -> &str {
        if self.is_sale() {
            &self.calculated_display
        } else {
            &self.original_display
        }
    }
}

/// Discount from `original` to `calculated`, in whole percent.
///
/// Returns `0.0` when there is no discount, when the calculated price is
/// higher than the original, or when `original` is not positive.
#[must_use]
pub fn percentage_diff(original: f64, calculated: f64) -> f64 {
    if !(original.is_finite() && calculated.is_finite()) || original <= 0.0 {
        return 0.0;
    }
    let diff = ((original - calculated) / original * 100.0).round();
    diff.max(0.0)
}

/// Where a [`SafePrice`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    /// Live pricing from the commerce backend.
    Medusa,
    /// The static override table.
    Hardcoded,
    /// Placeholder when nothing else was available.
    Fallback,
}

impl std::fmt::Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceSource::Medusa => write!(f, "medusa"),
            PriceSource::Hardcoded => write!(f, "hardcoded"),
            PriceSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// A display-ready price that is always produced, whatever failed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafePrice {
    pub formatted: String,
    pub amount: f64,
    pub currency: String,
    pub original_price: Option<f64>,
    pub source: PriceSource,
    /// Why a higher-priority source was skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SafePrice {
    /// A live price from the backend.
    #[must_use]
    pub fn live(amount: f64, original_price: Option<f64>, currency: &str) -> Self {
        let currency = currency.to_ascii_uppercase();
        Self {
            formatted: format_amount(amount, &currency),
            amount,
            currency,
            original_price,
            source: PriceSource::Medusa,
            error: None,
        }
    }

    /// A price taken from the static override table.
    #[must_use]
    pub fn from_override(entry: &PriceOverride, error: impl Into<String>) -> Self {
        Self {
            formatted: entry.formatted.clone(),
            amount: entry.amount,
            currency: entry.currency.clone(),
            original_price: entry.original_price,
            source: PriceSource::Hardcoded,
            error: Some(error.into()),
        }
    }

    /// The "Contact for price" placeholder.
    #[must_use]
    pub fn placeholder(currency: &str, error: impl Into<String>) -> Self {
        Self {
            formatted: CONTACT_FOR_PRICE.to_owned(),
            amount: 0.0,
            currency: currency.to_ascii_uppercase(),
            original_price: None,
            source: PriceSource::Fallback,
            error: Some(error.into()),
        }
    }
}
