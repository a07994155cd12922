//! # Display Formatting
//!
//! Rounding and rendering helpers for converted quantities. A converted value
//! such as `4.0` is shown as `4` so user-facing text does not carry a
//! redundant `.0`.

use serde_json::Value;

/// Returns `true` when `value` is a floating-point number with no fractional part.
///
/// Integers, strings, arrays and any other JSON kind return `false`.
///
/// # Examples
///
/// ```rust
/// use recipe_units::formatting::float_dot_zero;
/// use serde_json::json;
///
/// assert!(float_dot_zero(&json!(4.0)));
/// assert!(!float_dot_zero(&json!(0.4)));
/// assert!(!float_dot_zero(&json!("yogurt")));
/// assert!(!float_dot_zero(&json!(0)));
/// ```
pub fn float_dot_zero(value: &Value) -> bool {
    match value {
        Value::Number(number) if number.is_f64() => number.as_f64().is_some_and(is_whole),
        _ => false,
    }
}

/// Whether a finite float has a zero fractional part
pub fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Render a quantity, dropping the fraction when it is zero
pub fn format_quantity(value: f64) -> String {
    if is_whole(value) && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Round to `places` decimal digits using the exact decimal expansion of `value`.
///
/// Multiplying by a power of ten first would round values such as `1.585`
/// (stored as `1.58499...`) the wrong way.
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", places as usize, value)
        .parse()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_float_dot_zero() {
        assert!(float_dot_zero(&json!(4.0)));
        assert!(float_dot_zero(&json!(0.0)));
        assert!(!float_dot_zero(&json!(0.4)));
        assert!(!float_dot_zero(&json!("yogurt")));
        assert!(!float_dot_zero(&json!(0)));
        assert!(!float_dot_zero(&json!([])));
        assert!(!float_dot_zero(&Value::Null));
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(4.0), "4");
        assert_eq!(format_quantity(374.0), "374");
        assert_eq!(format_quantity(10.56), "10.56");
        assert_eq!(format_quantity(6.1), "6.1");
        assert_eq!(format_quantity(-0.0), "0");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.661386, 2), 0.66);
        assert_eq!(round_to(50.721, 2), 50.72);
        // 50.72 / 32 is stored just below 1.585
        assert_eq!(round_to(50.72 / 32.0, 2), 1.58);
        assert_eq!(round_to(2.4, 0), 2.0);
        assert!(round_to(f64::NAN, 2).is_nan());
    }
}
