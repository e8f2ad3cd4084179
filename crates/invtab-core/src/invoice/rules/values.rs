//! Cell value parsing.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Trimmed cell text, or `None` for blank cells.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Parse a whole-number quantity such as `"3"` or `" -2 "`.
pub fn parse_quantity(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Parse a plain decimal amount such as `"10.50"`.
///
/// No thousands separators or decimal commas: `"1.234,56"` is rejected.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let value = value.trim();
    if value.is_empty() || value.contains(',') {
        return None;
    }
    Decimal::from_str(value).ok()
}
