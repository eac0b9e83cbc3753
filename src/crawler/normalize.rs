//! Field normalizers for raw price and availability text.
//!
//! Both functions are total: unparsable input becomes zero, so a record
//! never carries a negative or missing number.

/// Converts price text such as `"£23.00"` to a number.
///
/// Every character other than an ASCII digit or `.` is dropped and the rest is
/// parsed as `f64`. Returns `0.0` and logs a warning when nothing parseable
/// remains.
#[must_use]
pub fn normalize_price(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(price) if price.is_finite() => price,
        _ => {
            tracing::warn!(raw = text, "Could not convert price");
            0.0
        }
    }
}

/// Extracts the stock count from availability text such as
/// `"In stock (22 available)"`.
///
/// Returns the first run of ASCII digits as an integer, or `0` when the text
/// has no digits (or the run overflows `u64`).
#[must_use]
pub fn normalize_stock(text: &str) -> u64 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(0)
}
