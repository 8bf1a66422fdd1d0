//! Decimal parsing and rounding for user-entered money values

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Parse a raw text-field value into a decimal.
///
/// Surrounding whitespace is ignored and a trailing decimal point is
/// accepted so that partial input such as `"12."` still parses. Only
/// `[+-]digits[.digits]` is a number: digit separators, exponents and
/// repeated points yield `None`, as does empty text.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if !is_plain_decimal(trimmed) {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && fraction.map_or(true, all_digits)
}

/// Round half away from zero to two decimal places, padded to scale 2.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// `round2(rate * quantity)` when both sides parse, `None` otherwise.
pub fn line_amount(rate: &str, quantity: &str) -> Option<Decimal> {
    let rate = parse_decimal(rate)?;
    let quantity = parse_decimal(quantity)?;
    rate.checked_mul(quantity).map(round2)
}

/// Parsed value, or zero when the text is empty or malformed.
pub fn parse_or_zero(raw: &str) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}
