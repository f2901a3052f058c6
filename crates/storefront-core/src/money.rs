//! Currency display formatting.
//!
//! Amounts are rendered the way an `en-US` locale shows money: a currency
//! symbol, comma-grouped thousands, and the currency's minor-unit digits.
//! Currencies without a known symbol are prefixed with their ISO code and a
//! space (`"GHS 1,200.00"`).

/// Returns the display symbol for an ISO 4217 code, if one is known.
///
/// Lookup is case-insensitive.
#[must_use]
pub fn currency_symbol(currency_code: &str) -> Option<&'static str> {
    let symbol = match currency_code.to_ascii_uppercase().as_str() {
        "NGN" => "₦",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CAD" => "C$",
        "AUD" => "A$",
        _ => return None,
    };
    Some(symbol)
}

/// Number of fraction digits shown for a currency.
fn fraction_digits(currency_code: &str) -> u32 {
    match currency_code.to_ascii_uppercase().as_str() {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "XAF" | "XOF" => 0,
        _ => 2,
    }
}

/// Formats `amount` as a display string in `currency_code`.
///
/// Non-finite amounts render as zero.
#[must_use]
pub fn format_amount(amount: f64, currency_code: &str) -> String {
    let code = currency_code.trim().to_ascii_uppercase();
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let digits = fraction_digits(&code);
    let scale = 10_u64.pow(digits);

    // Amounts shown in a storefront are far below 2^53, so the rounded value
    // fits a u64 exactly.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let minor = (amount.abs() * scale as f64).round() as u64;

    let whole = group_thousands(minor / scale);
    let sign = if amount < 0.0 && minor > 0 { "-" } else { "" };
    let number = if digits == 0 {
        whole
    } else {
        format!(
            "{whole}.{frac:0width$}",
            frac = minor % scale,
            width = digits as usize
        )
    };

    match currency_symbol(&code) {
        Some(symbol) => format!("{sign}{symbol}{number}"),
        None if code.is_empty() => format!("{sign}{number}"),
        None => format!("{sign}{code} {number}"),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
