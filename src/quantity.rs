//! # Locale Numeric Parser
//!
//! Parses the quantity text found on Italian recipe pages: comma decimals
//! (`"2,7"`), dot thousands grouping (`"1.500"`), fractions (`"1/2"`, `"½"`)
//! and ranges (`"15,5-20,2"`, `"5 o 6"`). Text that is not a quantity becomes
//! [`Quantity::NotApplicable`] and is carried through unchanged.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use tracing::trace;

use crate::formatting::format_quantity;

lazy_static! {
    static ref DECIMAL_PATTERN: Regex =
        Regex::new(r"^\d+(?:[.,]\d+)*$").expect("Invalid decimal regex pattern");
    static ref FRACTION_PATTERN: Regex = Regex::new(r"^(?:(?P<whole>\d+)\s+)?(?P<num>\d+)/(?P<den>\d+)$")
        .expect("Invalid fraction regex pattern");
    static ref UNICODE_FRACTION_PATTERN: Regex =
        Regex::new(r"^(?P<whole>\d+)?\s*(?P<frac>[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])$")
            .expect("Invalid unicode fraction regex pattern");
    static ref RANGE_PATTERN: Regex =
        Regex::new(r"^(?P<low>.+?)(?P<sep>\s*[-–]\s*|\s+o\s+)(?P<high>.+)$")
            .expect("Invalid range regex pattern");
}

/// The literal placeholder extractors use when a field is missing
pub const NOT_APPLICABLE: &str = "n/a";

/// How the two endpoints of a range were joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSeparator {
    /// `15-20`
    Hyphen,
    /// `5 o 6`
    Or,
}

impl RangeSeparator {
    pub(crate) fn from_text(separator: &str) -> Self {
        if separator.trim() == "o" {
            RangeSeparator::Or
        } else {
            RangeSeparator::Hyphen
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RangeSeparator::Hyphen => "-",
            RangeSeparator::Or => " o ",
        }
    }
}

/// A parsed quantity
#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    Numeric(f64),
    Range {
        low: f64,
        high: f64,
        separator: RangeSeparator,
    },
    /// No parseable quantity; holds the original text
    NotApplicable(String),
}

impl Quantity {
    pub fn not_applicable() -> Self {
        Quantity::NotApplicable(NOT_APPLICABLE.to_string())
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Quantity::NotApplicable(_))
    }

    /// Apply `f` to every numeric endpoint
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Quantity {
        match self {
            Quantity::Numeric(value) => Quantity::Numeric(f(*value)),
            Quantity::Range {
                low,
                high,
                separator,
            } => Quantity::Range {
                low: f(*low),
                high: f(*high),
                separator: *separator,
            },
            Quantity::NotApplicable(raw) => Quantity::NotApplicable(raw.clone()),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Numeric(value) => write!(f, "{}", format_quantity(*value)),
            Quantity::Range {
                low,
                high,
                separator,
            } => write!(
                f,
                "{}{}{}",
                format_quantity(*low),
                separator.as_str(),
                format_quantity(*high)
            ),
            Quantity::NotApplicable(raw) => write!(f, "{}", raw),
        }
    }
}

/// Parse a quantity field.
///
/// Never fails: anything that is not a number, fraction or range becomes
/// [`Quantity::NotApplicable`] holding the input verbatim.
///
/// # Examples
///
/// ```rust
/// use recipe_units::quantity::{parse_quantity, Quantity, RangeSeparator};
///
/// assert_eq!(parse_quantity("2,7"), Quantity::Numeric(2.7));
/// assert_eq!(
///     parse_quantity("15,5-20,2"),
///     Quantity::Range { low: 15.5, high: 20.2, separator: RangeSeparator::Hyphen }
/// );
/// assert_eq!(parse_quantity("(5 o 6"), Quantity::NotApplicable("(5 o 6".to_string()));
/// ```
pub fn parse_quantity(text: &str) -> Quantity {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_APPLICABLE) {
        return Quantity::NotApplicable(text.to_string());
    }

    if let Some(value) = parse_number(trimmed) {
        return Quantity::Numeric(value);
    }

    if let Some(captures) = RANGE_PATTERN.captures(trimmed) {
        let low = parse_number(&captures["low"]);
        let high = parse_number(&captures["high"]);
        if let (Some(low), Some(high)) = (low, high) {
            return Quantity::Range {
                low,
                high,
                separator: RangeSeparator::from_text(&captures["sep"]),
            };
        }
    }

    trace!(text = %text, "Quantity is not numeric, passing through");
    Quantity::NotApplicable(text.to_string())
}

/// Parse a single number written with Italian or English separators.
///
/// A leading `-` or `−` makes it negative (`-18` in `-18°C`).
pub fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    match token.strip_prefix('-').or_else(|| token.strip_prefix('−')) {
        Some(magnitude) => parse_unsigned(magnitude.trim_start()).map(|value| -value),
        None => parse_unsigned(token),
    }
}

fn parse_unsigned(token: &str) -> Option<f64> {
    if DECIMAL_PATTERN.is_match(token) {
        return normalize_decimal(token)?.parse().ok();
    }

    if let Some(captures) = FRACTION_PATTERN.captures(token) {
        let whole: f64 = match captures.name("whole") {
            Some(m) => m.as_str().parse().ok()?,
            None => 0.0,
        };
        let numerator: f64 = captures["num"].parse().ok()?;
        let denominator: f64 = captures["den"].parse().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(whole + numerator / denominator);
    }

    if let Some(captures) = UNICODE_FRACTION_PATTERN.captures(token) {
        let whole: f64 = match captures.name("whole") {
            Some(m) => m.as_str().parse().ok()?,
            None => 0.0,
        };
        return Some(whole + unicode_fraction_value(&captures["frac"])?);
    }

    None
}

fn unicode_fraction_value(fraction: &str) -> Option<f64> {
    let value = match fraction {
        "½" => 1.0 / 2.0,
        "⅓" => 1.0 / 3.0,
        "⅔" => 2.0 / 3.0,
        "¼" => 1.0 / 4.0,
        "¾" => 3.0 / 4.0,
        "⅕" => 1.0 / 5.0,
        "⅖" => 2.0 / 5.0,
        "⅗" => 3.0 / 5.0,
        "⅘" => 4.0 / 5.0,
        "⅙" => 1.0 / 6.0,
        "⅚" => 5.0 / 6.0,
        "⅛" => 1.0 / 8.0,
        "⅜" => 3.0 / 8.0,
        "⅝" => 5.0 / 8.0,
        "⅞" => 7.0 / 8.0,
        _ => return None,
    };
    Some(value)
}

/// Rewrite a digit string with `.`/`,` separators into Rust float syntax.
///
/// The last separator is the decimal mark when both kinds appear. A lone `,`
/// is decimal. Dots followed by groups of exactly three digits after a short
/// non-zero lead (`1.500`, `12.000.000`) are thousands grouping.
fn normalize_decimal(token: &str) -> Option<String> {
    let last_comma = token.rfind(',');
    let last_dot = token.rfind('.');

    match (last_comma, last_dot) {
        (None, None) => Some(token.to_string()),
        (Some(comma), Some(dot)) => {
            if comma > dot {
                Some(token.replace('.', "").replace(',', "."))
            } else {
                Some(token.replace(',', ""))
            }
        }
        (Some(_), None) => {
            if token.matches(',').count() == 1 {
                Some(token.replace(',', "."))
            } else {
                None
            }
        }
        (None, Some(_)) => {
            let groups: Vec<&str> = token.split('.').collect();
            let lead = groups[0];
            let grouped = lead.len() <= 3
                && !lead.starts_with('0')
                && groups[1..].iter().all(|group| group.len() == 3);
            if grouped {
                Some(groups.concat())
            } else if groups.len() == 2 {
                Some(token.to_string())
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_decimal() {
        assert_eq!(parse_quantity("2,7"), Quantity::Numeric(2.7));
        assert_eq!(parse_quantity(" 1,5 "), Quantity::Numeric(1.5));
    }

    #[test]
    fn test_dot_decimal_and_grouping() {
        assert_eq!(parse_quantity("1.5"), Quantity::Numeric(1.5));
        assert_eq!(parse_quantity("0.125"), Quantity::Numeric(0.125));
        assert_eq!(parse_quantity("1.500"), Quantity::Numeric(1500.0));
        assert_eq!(parse_quantity("1.000.000"), Quantity::Numeric(1_000_000.0));
        assert_eq!(parse_quantity("1.250,5"), Quantity::Numeric(1250.5));
        assert_eq!(parse_quantity("1,250.5"), Quantity::Numeric(1250.5));
        assert!(parse_quantity("1.2.3").is_not_applicable());
        assert!(parse_quantity("1,2,3").is_not_applicable());
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(parse_number("-18"), Some(-18.0));
        assert_eq!(parse_number("−2,5"), Some(-2.5));
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_quantity("-18"), Quantity::Numeric(-18.0));
    }

    #[test]
    fn test_fractions() {
        assert_eq!(parse_quantity("1/2"), Quantity::Numeric(0.5));
        assert_eq!(parse_quantity("1 1/2"), Quantity::Numeric(1.5));
        assert_eq!(parse_quantity("½"), Quantity::Numeric(0.5));
        assert_eq!(parse_quantity("2¼"), Quantity::Numeric(2.25));
        assert!(parse_quantity("1/0").is_not_applicable());
    }

    #[test]
    fn test_ranges() {
        assert_eq!(
            parse_quantity("15,5-20,2"),
            Quantity::Range {
                low: 15.5,
                high: 20.2,
                separator: RangeSeparator::Hyphen
            }
        );
        assert_eq!(
            parse_quantity("5 o 6"),
            Quantity::Range {
                low: 5.0,
                high: 6.0,
                separator: RangeSeparator::Or
            }
        );
        assert_eq!(
            parse_quantity("2 – 3"),
            Quantity::Range {
                low: 2.0,
                high: 3.0,
                separator: RangeSeparator::Hyphen
            }
        );
    }

    #[test]
    fn test_not_applicable_keeps_raw_text() {
        assert_eq!(
            parse_quantity("(5 o 6"),
            Quantity::NotApplicable("(5 o 6".to_string())
        );
        assert_eq!(parse_quantity("n/a"), Quantity::not_applicable());
        assert_eq!(
            parse_quantity("q.b."),
            Quantity::NotApplicable("q.b.".to_string())
        );
        assert_eq!(parse_quantity(""), Quantity::NotApplicable(String::new()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Quantity::Numeric(4.0).to_string(), "4");
        assert_eq!(parse_quantity("5 o 6").to_string(), "5 o 6");
        assert_eq!(parse_quantity("15,5-20,2").to_string(), "15.5-20.2");
        assert_eq!(parse_quantity("(5 o 6").to_string(), "(5 o 6");
    }

    #[test]
    fn test_map_skips_not_applicable() {
        let doubled = parse_quantity("1-2").map(|v| v * 2.0);
        assert_eq!(doubled.to_string(), "2-4");
        assert!(Quantity::not_applicable().map(|v| v * 2.0).is_not_applicable());
    }
}
