//! Classification of raw variant pricing values into typed shapes.
//!
//! Every accessor here is total: malformed input yields `None`, never an
//! error, so the normalizer can chain them first-match-wins.

use serde_json::{Map, Value};

/// The shape of a variant's `calculated_price` field.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PricingShape<'a> {
    Absent,
    Number(f64),
    Object(&'a Map<String, Value>),
}

impl<'a> PricingShape<'a> {
    pub(crate) fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => PricingShape::Object(map),
            other => amount(other).map_or(PricingShape::Absent, PricingShape::Number),
        }
    }

    pub(crate) fn number(self) -> Option<f64> {
        match self {
            PricingShape::Number(n) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn object(self) -> Option<&'a Map<String, Value>> {
        match self {
            PricingShape::Object(map) => Some(map),
            _ => None,
        }
    }
}

/// One entry of the legacy `prices` array.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LegacyPrice {
    pub amount: Option<f64>,
    pub currency_code: Option<String>,
}

/// Parses the legacy `prices` array, skipping entries that are not objects.
pub(crate) fn legacy_prices(value: &Value) -> Vec<LegacyPrice> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| LegacyPrice {
            amount: entry.get("amount").and_then(amount),
            currency_code: entry.get("currency_code").and_then(text),
        })
        .collect()
}

/// Interprets a JSON value as a price amount.
///
/// Accepts numbers and numeric strings. Rejects non-numeric strings,
/// negative and non-finite values.
pub(crate) fn amount(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n)
}

/// Non-empty, trimmed string content.
pub(crate) fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Looks up `key` in an object and interprets it as an amount.
pub(crate) fn field_amount(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(amount)
}

/// Looks up a currency-keyed amount, trying the code as given, then upper
/// and lower case.
pub(crate) fn keyed_amount(map: &Map<String, Value>, currency_code: &str) -> Option<f64> {
    [
        currency_code.to_owned(),
        currency_code.to_ascii_uppercase(),
        currency_code.to_ascii_lowercase(),
    ]
    .iter()
    .find_map(|key| field_amount(map, key))
}

/// First value in the object that reads as an amount, in key order.
pub(crate) fn first_amount(map: &Map<String, Value>) -> Option<f64> {
    map.values().find_map(amount)
}
