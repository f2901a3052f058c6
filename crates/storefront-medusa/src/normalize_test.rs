use serde_json::json;

use super::*;

fn variant(value: serde_json::Value) -> StoreVariant {
    serde_json::from_value(value).expect("variant fixture should deserialize")
}

fn assert_amount(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// -----------------------------------------------------------------------
// calculated amount, one test per extractor
// -----------------------------------------------------------------------

#[test]
fn structured_calculated_price() {
    let v = variant(json!({
        "calculated_price": {"calculated_amount": 1200, "currency_code": "NGN"}
    }));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.calculated_amount, 1200.0);
    assert_eq!(price.currency_code, "NGN");
    assert_amount(price.percentage_diff, 0.0);
    assert_eq!(price.price_type, "default");
}

#[test]
fn bare_number_calculated_price() {
    let v = variant(json!({"calculated_price": 1500}));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.calculated_amount, 1500.0);
    assert_amount(price.original_amount, 1500.0);
}

#[test]
fn amount_key_on_pricing_object() {
    let v = variant(json!({"calculated_price": {"amount": "2500", "currency_code": "usd"}}));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.calculated_amount, 2500.0);
    assert_eq!(price.currency_code, "USD");
}

#[test]
fn currency_keyed_object_uses_default_currency() {
    let v = variant(json!({"calculated_price": {"USD": 10, "NGN": 8000}}));
    let price = normalize_variant(&v, Some("NGN")).unwrap();
    assert_amount(price.calculated_amount, 8000.0);
    assert_eq!(price.currency_code, "NGN");
}

#[test]
fn currency_keyed_object_uses_explicit_currency() {
    let v = variant(json!({"calculated_price": {"currency_code": "usd", "USD": 45, "NGN": 70000}}));
    let price = normalize_variant(&v, Some("NGN")).unwrap();
    assert_amount(price.calculated_amount, 45.0);
    assert_eq!(price.currency_code, "USD");
}

#[test]
fn object_scan_finds_any_numeric_value() {
    let v = variant(json!({"calculated_price": {"id": "pset_1", "value": "3100"}}));
    let price = normalize_variant(&v, Some("EUR")).unwrap();
    assert_amount(price.calculated_amount, 3100.0);
    assert_eq!(price.currency_code, "EUR");
}

#[test]
fn legacy_original_price_scalar() {
    let v = variant(json!({"original_price": 4000, "price": 3000}));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.calculated_amount, 4000.0);
    assert_amount(price.original_amount, 4000.0);
}

#[test]
fn legacy_price_scalar() {
    let v = variant(json!({"price": "3000"}));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.calculated_amount, 3000.0);
}

#[test]
fn legacy_prices_array() {
    let v = variant(json!({"prices": [{"amount": 800, "currency_code": "USD"}]}));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.calculated_amount, 800.0);
    assert_eq!(price.currency_code, "USD");
}

#[test]
fn legacy_prices_prefers_currency_match() {
    let v = variant(json!({
        "prices": [
            {"amount": 10, "currency_code": "usd"},
            {"amount": 9000, "currency_code": "ngn"}
        ]
    }));
    // No pricing object: the currency falls back to the first entry, so the
    // first entry is also the match.
    let price = normalize_variant(&v, Some("NGN")).unwrap();
    assert_amount(price.calculated_amount, 10.0);
    assert_eq!(price.currency_code, "USD");
}

#[test]
fn legacy_prices_match_pricing_object_currency() {
    let v = variant(json!({
        "calculated_price": {"currency_code": "NGN"},
        "prices": [
            {"amount": 10, "currency_code": "usd"},
            {"amount": 9000, "currency_code": "ngn"}
        ]
    }));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.calculated_amount, 9000.0);
    assert_eq!(price.currency_code, "NGN");
}

#[test]
fn metadata_price() {
    let v = variant(json!({"metadata": {"price": "6500"}}));
    let price = normalize_variant(&v, Some("NGN")).unwrap();
    assert_amount(price.calculated_amount, 6500.0);
    assert_eq!(price.currency_code, "NGN");
}

#[test]
fn no_price_anywhere_is_none() {
    let v = variant(json!({
        "id": "variant_1",
        "calculated_price": null,
        "prices": [],
        "metadata": {"color": "red"}
    }));
    assert!(normalize_variant(&v, Some("NGN")).is_none());
}

// -----------------------------------------------------------------------
// preference and edge cases
// -----------------------------------------------------------------------

#[test]
fn structured_field_beats_legacy_fields() {
    let v = variant(json!({
        "calculated_price": {"calculated_amount": 1200, "amount": 999, "currency_code": "NGN"},
        "price": 5000,
        "prices": [{"amount": 7000, "currency_code": "NGN"}]
    }));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.calculated_amount, 1200.0);
}

#[test]
fn non_numeric_string_is_ignored_not_zero() {
    let v = variant(json!({
        "calculated_price": {"calculated_amount": "TBD", "currency_code": "NGN"},
        "price": "4200"
    }));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.calculated_amount, 4200.0);
}

#[test]
fn only_non_numeric_strings_yields_none() {
    let v = variant(json!({"calculated_price": "free", "price": "call"}));
    assert!(normalize_variant(&v, None).is_none());
}

#[test]
fn negative_amount_is_treated_as_absent() {
    let v = variant(json!({"calculated_price": -5, "price": 100}));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.calculated_amount, 100.0);
}

#[test]
fn zero_is_a_valid_price() {
    let v = variant(json!({"calculated_price": 0}));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.calculated_amount, 0.0);
}

// -----------------------------------------------------------------------
// currency, original amount, price type
// -----------------------------------------------------------------------

#[test]
fn currency_falls_back_to_store_default() {
    let v = variant(json!({"calculated_price": 1500}));
    let price = normalize_variant(&v, None).unwrap();
    assert_eq!(price.currency_code, "NGN");
}

#[test]
fn blank_default_currency_is_ignored() {
    let v = variant(json!({"calculated_price": 1500}));
    let price = normalize_variant(&v, Some("  ")).unwrap();
    assert_eq!(price.currency_code, "NGN");
}

#[test]
fn explicit_original_amount_produces_discount() {
    let v = variant(json!({
        "calculated_price": {
            "calculated_amount": 8000,
            "original_amount": 10000,
            "currency_code": "ngn",
            "calculated_price": {"price_list_type": "sale"}
        }
    }));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.original_amount, 10_000.0);
    assert_amount(price.percentage_diff, 20.0);
    assert_eq!(price.price_type, "sale");
    assert!(price.is_sale());
    assert_eq!(price.calculated_display, "₦8,000.00");
    assert_eq!(price.original_display, "₦10,000.00");
}

#[test]
fn legacy_original_price_is_used_as_original_amount() {
    let v = variant(json!({"calculated_price": 900, "original_price": 1000}));
    let price = normalize_variant(&v, Some("USD")).unwrap();
    assert_amount(price.calculated_amount, 900.0);
    assert_amount(price.original_amount, 1000.0);
    assert_amount(price.percentage_diff, 10.0);
}

#[test]
fn higher_original_is_not_reported_as_negative_discount() {
    let v = variant(json!({
        "calculated_price": {"calculated_amount": 1200, "original_amount": 1000, "currency_code": "NGN"}
    }));
    let price = normalize_variant(&v, None).unwrap();
    assert_amount(price.percentage_diff, 0.0);
    assert!(!price.is_sale());
}

#[test]
fn price_type_read_from_flat_field() {
    let v = variant(json!({"calculated_price": {"amount": 10, "price_type": "sale"}}));
    let price = normalize_variant(&v, Some("USD")).unwrap();
    assert_eq!(price.price_type, "sale");
    // Sale type without a discount is still not a sale.
    assert!(!price.is_sale());
}
