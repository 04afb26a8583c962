//! Lenient parsing of user-entered numbers.
//!
//! The editor form sends whatever the user has typed so far. Nothing here fails:
//! values that are not numbers, or are negative, become zero. Numbers too large
//! for a decimal saturate.

use std::str::FromStr;

use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Normalize a typed number: full-width digits and punctuation become ASCII,
/// thousands separators and whitespace are dropped.
pub fn normalize_number(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32),
            '．' | '。' => Some('.'),
            '－' | '−' => Some('-'),
            ',' | '，' | '_' => None,
            c if c.is_whitespace() => None,
            c => Some(c),
        })
        .collect()
}

/// Parse a typed price. Unparseable or negative input yields zero.
pub fn parse_price(raw: &str) -> Decimal {
    let normalized = normalize_number(raw);
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
        .or_else(|| out_of_range(&normalized))
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}

/// A well-formed number outside the decimal range, clamped to the nearest bound.
/// Magnitudes below one have underflowed and read as zero.
fn out_of_range(normalized: &str) -> Option<Decimal> {
    let value = normalized.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let clamped = if value.abs() < 1.0 {
        Decimal::ZERO
    } else if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    };
    Some(clamped)
}

/// Parse a typed count, truncating any fractional part.
pub fn parse_quantity(raw: &str) -> u32 {
    to_count(parse_price(raw))
}

/// Price from a JSON form value (number or numeric string).
pub fn price_from_value(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_price(&n.to_string()),
        Value::String(s) => parse_price(s),
        _ => Decimal::ZERO,
    }
}

/// Count from a JSON form value (number or numeric string).
pub fn quantity_from_value(value: &Value) -> u32 {
    to_count(price_from_value(value))
}

/// Day from a JSON form value. Days start at 1, so zero means "no day".
pub fn day_from_value(value: &Value) -> Option<u32> {
    match quantity_from_value(value) {
        0 => None,
        day => Some(day),
    }
}

fn to_count(amount: Decimal) -> u32 {
    amount.trunc().to_u32().unwrap_or(u32::MAX)
}

pub(crate) fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(price_from_value(&value))
}

pub(crate) fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(quantity_from_value(&value))
}

pub(crate) fn deserialize_day<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(day_from_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_price_plain_and_formatted() {
        assert_eq!(parse_price("1500"), dec!(1500));
        assert_eq!(parse_price(" 12,500.50 "), dec!(12500.50));
        assert_eq!(parse_price("３０００"), dec!(3000));
        assert_eq!(parse_price("1e3"), dec!(1000));
    }

    #[test]
    fn test_parse_price_clamps_invalid_to_zero() {
        assert_eq!(parse_price(""), Decimal::ZERO);
        assert_eq!(parse_price("abc"), Decimal::ZERO);
        assert_eq!(parse_price("-200"), Decimal::ZERO);
        assert_eq!(parse_price("－５"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_price_saturates_out_of_range() {
        assert_eq!(parse_price("1e100"), Decimal::MAX);
        assert_eq!(parse_price("79228162514264337593543950336"), Decimal::MAX);
        assert_eq!(parse_price("-1e100"), Decimal::ZERO);
        assert_eq!(parse_price("1e-100"), Decimal::ZERO);
        assert_eq!(parse_price("inf"), Decimal::ZERO);
        assert_eq!(parse_price("NaN"), Decimal::ZERO);
        assert_eq!(price_from_value(&json!(1e100)), Decimal::MAX);
        assert_eq!(parse_quantity("1e100"), u32::MAX);
    }

    #[test]
    fn test_parse_quantity_truncates() {
        assert_eq!(parse_quantity("2.9"), 2);
        assert_eq!(parse_quantity("-1"), 0);
        assert_eq!(parse_quantity("99999999999999"), u32::MAX);
    }

    #[test]
    fn test_values_from_json() {
        assert_eq!(price_from_value(&json!(0.1)), dec!(0.1));
        assert_eq!(price_from_value(&json!("250")), dec!(250));
        assert_eq!(price_from_value(&json!(null)), Decimal::ZERO);
        assert_eq!(price_from_value(&json!(true)), Decimal::ZERO);
        assert_eq!(quantity_from_value(&json!(-3)), 0);
        assert_eq!(quantity_from_value(&json!(4)), 4);
    }

    #[test]
    fn test_day_from_value() {
        assert_eq!(day_from_value(&json!(2)), Some(2));
        assert_eq!(day_from_value(&json!(0)), None);
        assert_eq!(day_from_value(&json!(null)), None);
        assert_eq!(day_from_value(&json!("x")), None);
    }
}
