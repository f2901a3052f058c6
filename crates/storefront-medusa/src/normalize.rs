//! Normalization from raw variant pricing to [`storefront_core::NormalizedPrice`].
//!
//! Shape classification lives in the `shape` module; this module decides which
//! shape is authoritative. Richer structured shapes win over legacy fields.

use serde_json::{Map, Value};
use storefront_core::{NormalizedPrice, DEFAULT_CURRENCY_CODE};

use crate::shape::{
    amount, field_amount, first_amount, keyed_amount, legacy_prices, text, LegacyPrice,
    PricingShape,
};
use crate::types::StoreVariant;

/// Which field supplied a variant's calculated amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountSource {
    /// `calculated_price` was a bare number.
    PricingNumber,
    /// `calculated_price.calculated_amount`.
    CalculatedAmount,
    /// `calculated_price.amount`.
    Amount,
    /// `calculated_price[<currency>]`.
    CurrencyKey,
    /// First numeric value inside `calculated_price`.
    ObjectScan,
    /// Legacy `original_price`.
    LegacyOriginalPrice,
    /// Legacy `price`.
    LegacyPrice,
    /// Legacy `prices[]` entry.
    LegacyPrices,
    /// `metadata.price`.
    Metadata,
}

/// Normalizes a variant's pricing into a [`NormalizedPrice`].
///
/// `default_currency` is used when neither the pricing object nor the legacy
/// `prices` array names a currency; when it is `None` the store default
/// applies.
///
/// Returns `None` when no price is discoverable in any shape. Callers must
/// treat that as "no price available" rather than as zero.
#[must_use]
pub fn normalize_variant(
    variant: &StoreVariant,
    default_currency: Option<&str>,
) -> Option<NormalizedPrice> {
    let shape = PricingShape::classify(&variant.calculated_price);
    let object = shape.object();
    let legacy = legacy_prices(&variant.prices);

    let currency_code = object
        .and_then(|o| o.get("currency_code"))
        .and_then(text)
        .or_else(|| legacy.first().and_then(|p| p.currency_code.clone()))
        .or_else(|| {
            default_currency
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_owned());

    let (calculated, source) = calculated_amount(variant, shape, &legacy, &currency_code)?;

    let original = object
        .and_then(|o| field_amount(o, "original_amount"))
        .or_else(|| amount(&variant.original_price))
        .unwrap_or(calculated);

    let price_type = object.and_then(price_type).unwrap_or_else(|| "default".to_owned());

    tracing::debug!(
        variant_id = variant.id.as_deref().unwrap_or(""),
        source = ?source,
        calculated,
        original,
        currency_code = %currency_code,
        "normalized variant price"
    );

    Some(NormalizedPrice::new(
        calculated,
        original,
        &currency_code,
        &price_type,
    ))
}

/// Runs the calculated-amount extractors in preference order.
fn calculated_amount(
    variant: &StoreVariant,
    shape: PricingShape<'_>,
    legacy: &[LegacyPrice],
    currency_code: &str,
) -> Option<(f64, AmountSource)> {
    let object = shape.object();
    let tagged = |source: AmountSource| move |n: f64| (n, source);

    shape
        .number()
        .map(tagged(AmountSource::PricingNumber))
        .or_else(|| {
            object
                .and_then(|o| field_amount(o, "calculated_amount"))
                .map(tagged(AmountSource::CalculatedAmount))
        })
        .or_else(|| {
            object
                .and_then(|o| field_amount(o, "amount"))
                .map(tagged(AmountSource::Amount))
        })
        .or_else(|| {
            object
                .and_then(|o| keyed_amount(o, currency_code))
                .map(tagged(AmountSource::CurrencyKey))
        })
        .or_else(|| {
            object
                .and_then(first_amount)
                .map(tagged(AmountSource::ObjectScan))
        })
        .or_else(|| amount(&variant.original_price).map(tagged(AmountSource::LegacyOriginalPrice)))
        .or_else(|| amount(&variant.price).map(tagged(AmountSource::LegacyPrice)))
        .or_else(|| {
            pick_legacy(legacy, currency_code)
                .and_then(|p| p.amount)
                .map(tagged(AmountSource::LegacyPrices))
        })
        .or_else(|| {
            variant
                .metadata
                .get("price")
                .and_then(amount)
                .map(tagged(AmountSource::Metadata))
        })
}

/// Legacy entry whose currency matches case-insensitively, else the first entry.
fn pick_legacy<'a>(legacy: &'a [LegacyPrice], currency_code: &str) -> Option<&'a LegacyPrice> {
    legacy
        .iter()
        .find(|p| {
            p.currency_code
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(currency_code))
        })
        .or_else(|| legacy.first())
}

/// `calculated_price.calculated_price.price_list_type`, else `price_type`.
fn price_type(object: &Map<String, Value>) -> Option<String> {
    object
        .get("calculated_price")
        .and_then(|nested| nested.get("price_list_type"))
        .and_then(text)
        .or_else(|| object.get("price_type").and_then(text))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
