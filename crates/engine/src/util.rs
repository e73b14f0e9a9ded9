//! Internal helpers for numeric validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize the
//! rounding policy and the text-to-number rules so the ledger and the
//! calculator agree on them.

use crate::{EngineError, ResultEngine};

/// Number of decimal places every stored result is rounded to.
pub(crate) const PRECISION: i32 = 8;

const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

/// Round `value` to [`PRECISION`] decimal places (nearest, ties away from
/// zero) to suppress binary floating-point drift such as `0.1 + 0.2`.
pub(crate) fn round_value(value: f64) -> f64 {
    let scale = 10f64.powi(PRECISION);
    let scaled = (value + f64::EPSILON.copysign(value)) * scale;
    // Past 2^53 every f64 is already an integer, so there is nothing left to
    // round and scaling back could only lose bits.
    if !scaled.is_finite() || value.abs() >= MAX_EXACT {
        return value;
    }
    let rounded = scaled.round() / scale;
    // Avoid handing out `-0.0`, which would render as "-0".
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Reject NaN and infinities before they reach the ledger.
pub(crate) fn ensure_finite(value: f64, label: &str) -> ResultEngine<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::InvalidValue(format!("{label} must be finite, got {value}")))
    }
}

/// Parse an entry buffer the lenient way a calculator display does: anything
/// that is not a number (an empty buffer, a lone `-`) counts as zero.
///
/// A digit string too long for an `f64` parses to an infinity; callers that
/// commit the value go through [`ensure_finite`].
pub(crate) fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    trimmed.parse::<f64>().unwrap_or(0.0)
}

/// Parse an entry buffer in currency mode.
///
/// Text that already contains a decimal point is taken as major units
/// (`"5.25"` is 5.25). Anything else is minor units (`"525"` is 5.25).
pub(crate) fn parse_currency(text: &str) -> f64 {
    let value = parse_number(text);
    if text.contains('.') {
        value
    } else {
        round_value(value / 100.0)
    }
}

/// Render a number back into an entry buffer.
pub(crate) fn number_to_entry(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_suppresses_drift() {
        assert_eq!(round_value(0.1 + 0.2), 0.3);
        assert_eq!(round_value(1.005 * 1000.0), 1005.0);
        assert_eq!(round_value(-0.1 - 0.2), -0.3);
        assert_eq!(round_value(1.0 / 3.0), 0.33333333);
    }

    #[test]
    fn rounding_still_applies_above_the_exact_scaled_range() {
        // Scaled by 1e8 these exceed 2^53, yet the drift must still go.
        assert_eq!(round_value(1_000_000_000.1 + 0.7), 1_000_000_000.8);
        assert_eq!(round_value(-(1_000_000_000.1 + 0.7)), -1_000_000_000.8);
    }

    #[test]
    fn rounding_leaves_integral_huge_values_alone() {
        assert_eq!(round_value(1e300), 1e300);
        assert_eq!(round_value(-1e20), -1e20);
        assert!(round_value(f64::INFINITY).is_infinite());
    }

    #[test]
    fn rounding_never_yields_negative_zero() {
        let value = round_value(-0.000_000_000_1);
        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
    }

    #[test]
    fn lenient_parse_treats_garbage_as_zero() {
        assert_eq!(parse_number("12.5"), 12.5);
        assert_eq!(parse_number("7."), 7.0);
        assert_eq!(parse_number("-"), 0.0);
        assert_eq!(parse_number(""), 0.0);
    }

    #[test]
    fn overlong_digit_strings_parse_as_infinite() {
        assert_eq!(parse_number(&"9".repeat(310)), f64::INFINITY);
        assert_eq!(parse_currency(&format!("-{}", "9".repeat(310))), f64::NEG_INFINITY);
    }

    #[test]
    fn currency_parse_uses_minor_units_without_a_point() {
        assert_eq!(parse_currency("525"), 5.25);
        assert_eq!(parse_currency("5.25"), 5.25);
        assert_eq!(parse_currency("5."), 5.0);
        assert_eq!(parse_currency("-1999"), -19.99);
    }

    #[test]
    fn entry_rendering_drops_trailing_zeroes() {
        assert_eq!(number_to_entry(5.0), "5");
        assert_eq!(number_to_entry(0.05), "0.05");
        assert_eq!(number_to_entry(-0.0), "0");
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(ensure_finite(f64::NAN, "value").is_err());
        assert!(ensure_finite(f64::INFINITY, "value").is_err());
        assert_eq!(ensure_finite(3.5, "value"), Ok(3.5));
    }
}
