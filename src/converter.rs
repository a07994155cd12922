//! # Unit Converter
//!
//! The entry point for recipe extractors. A [`UnitConverter`] owns the unit
//! vocabulary, the conversion table, the simplification chains and the
//! compiled scanner. It is built once and shared; every method is a pure
//! function of its input.
//!
//! - [`UnitConverter::convert_units_ing`]: an already split quantity/unit pair
//! - [`UnitConverter::convert_units_prep`]: a preparation step in prose
//! - [`UnitConverter::convert_units_name`]: an ingredient name
//! - [`UnitConverter::simplify_units`]: an imperial quantity that may need a larger unit

use serde_json::Value;
use std::fmt;
use std::ops::Range;
use std::time::Instant;
use tracing::{debug, trace};

use crate::config::{load_unit_aliases_config, ConverterConfig, DEFAULT_DECIMAL_PLACES};
use crate::conversion_table::{ConversionRule, ConversionTable};
use crate::errors::{error_logging, AppError, AppResult};
use crate::formatting::{float_dot_zero, format_quantity, round_to};
use crate::observability::{
    conversion_span, record_conversion_metrics, record_text_processing_metrics,
    record_type_mismatch,
};
use crate::quantity::{parse_quantity, Quantity, NOT_APPLICABLE};
use crate::simplify::{SimplificationChains, Simplified};
use crate::text_processing::{splice, MeasurementScanner, MeasurementSpan, ScanMode, SpanKind};
use crate::units::{Unit, UnitVocabulary};

/// A converted amount: a quantity, mixed feet-and-inches notation, or the
/// input text when nothing was converted
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    Quantity(Quantity),
    Mixed(String),
    Text(String),
}

impl Amount {
    /// JSON rendering used in recipe documents; whole floats become integers
    pub fn to_json(&self) -> Value {
        match self {
            Amount::Quantity(Quantity::Numeric(value)) => {
                let json = Value::from(*value);
                if float_dot_zero(&json) {
                    Value::from(*value as i64)
                } else {
                    json
                }
            }
            other => Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Quantity(quantity) => write!(f, "{}", quantity),
            Amount::Mixed(text) | Amount::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Result of converting or simplifying a quantity/unit pair
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub amount: Amount,
    pub unit: String,
}

impl Converted {
    fn unchanged(quantity: Quantity, unit: &str) -> Self {
        Self {
            amount: Amount::Quantity(quantity),
            unit: unit.to_string(),
        }
    }

    fn verbatim(quantity_text: &str, unit: &str) -> Self {
        Self {
            amount: Amount::Text(quantity_text.to_string()),
            unit: unit.to_string(),
        }
    }

    fn from_simplified(simplified: Simplified) -> Self {
        match simplified {
            Simplified::Numeric { value, unit } => Self {
                amount: Amount::Quantity(Quantity::Numeric(value)),
                unit: unit.label().to_string(),
            },
            Simplified::Mixed { text, label } => Self {
                amount: Amount::Mixed(text),
                unit: label.to_string(),
            },
        }
    }

    /// The numeric value, when the amount is a single number
    pub fn value(&self) -> Option<f64> {
        match self.amount {
            Amount::Quantity(Quantity::Numeric(value)) => Some(value),
            _ => None,
        }
    }
}

/// Metric to imperial converter
#[derive(Debug, Clone)]
pub struct UnitConverter {
    vocabulary: UnitVocabulary,
    table: ConversionTable,
    chains: SimplificationChains,
    scanner: MeasurementScanner,
    decimal_places: u32,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self {
            vocabulary: UnitVocabulary::default(),
            table: ConversionTable::default(),
            chains: SimplificationChains::default(),
            scanner: MeasurementScanner::new(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl UnitConverter {
    /// Converter with the built-in vocabulary, table and chains
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_units::UnitConverter;
    ///
    /// let converter = UnitConverter::new();
    /// assert_eq!(converter.convert_units_prep("300g"), "10.56oz");
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a converter from explicit parts, validating each of them
    pub fn with_parts(
        vocabulary: UnitVocabulary,
        table: ConversionTable,
        chains: SimplificationChains,
        decimal_places: u32,
    ) -> AppResult<Self> {
        table.validate()?;
        chains.validate()?;
        let scanner = MeasurementScanner::with_vocabulary(&vocabulary)
            .map_err(|e| AppError::Config(format!("invalid unit pattern: {}", e)))?;
        Ok(Self {
            vocabulary,
            table,
            chains,
            scanner,
            decimal_places,
        })
    }

    /// Build a converter from configuration, loading extra unit aliases if configured
    pub fn from_config(config: &ConverterConfig) -> AppResult<Self> {
        config.validate()?;

        let mut vocabulary = UnitVocabulary::default();
        if let Some(path) = &config.unit_aliases_path {
            let aliases = load_unit_aliases_config(path)?;
            for (unit, spellings) in aliases.unit_aliases {
                vocabulary.extend(unit, spellings);
            }
        }

        Self::with_parts(
            vocabulary,
            ConversionTable::default(),
            SimplificationChains::default(),
            config.decimal_places,
        )
    }

    pub fn vocabulary(&self) -> &UnitVocabulary {
        &self.vocabulary
    }

    pub fn scanner(&self) -> &MeasurementScanner {
        &self.scanner
    }

    /// Convert an ingredient's quantity and unit fields.
    ///
    /// Unparseable quantities and unknown units (including `n/a`) come back
    /// as the input text, untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_units::UnitConverter;
    ///
    /// let converter = UnitConverter::new();
    /// let converted = converter.convert_units_ing("2,7", "kg");
    /// assert_eq!(converted.value(), Some(5.95));
    /// assert_eq!(converted.unit, "lb");
    ///
    /// let untouched = converter.convert_units_ing("(5 o 6", "n/a");
    /// assert_eq!(untouched.amount.to_string(), "(5 o 6");
    /// assert_eq!(untouched.unit, "n/a");
    /// ```
    pub fn convert_units_ing(&self, quantity_text: &str, unit_text: &str) -> Converted {
        let quantity = parse_quantity(quantity_text);
        match self.rule_for(&quantity, unit_text) {
            Some(rule) => self.convert_with_rule(&quantity, rule, unit_text),
            None => Converted::verbatim(quantity_text, unit_text),
        }
    }

    /// Convert an already parsed quantity; without a rule it comes back as given
    pub fn convert_quantity(&self, quantity: Quantity, unit_text: &str) -> Converted {
        match self.rule_for(&quantity, unit_text) {
            Some(rule) => self.convert_with_rule(&quantity, rule, unit_text),
            None => Converted::unchanged(quantity, unit_text),
        }
    }

    /// The rule to apply, or `None` when the pair must pass through
    fn rule_for(&self, quantity: &Quantity, unit_text: &str) -> Option<&ConversionRule> {
        let unit = self.vocabulary.resolve(unit_text);
        if quantity.is_not_applicable() {
            trace!(unit = %unit_text, "Quantity not applicable, passing through");
            record_conversion_metrics(unit, "not_applicable");
            return None;
        }

        let rule = unit.and_then(|unit| self.table.rule(unit));
        if rule.is_none() {
            debug!(unit = %unit_text, "Unit not recognized, passing through");
            record_conversion_metrics(unit, "unknown_unit");
        }
        rule
    }

    fn convert_with_rule(
        &self,
        quantity: &Quantity,
        rule: &ConversionRule,
        unit_text: &str,
    ) -> Converted {
        let converted = self.apply_rule(quantity, rule);
        debug!(
            quantity = %quantity,
            unit = %unit_text,
            converted = %converted.amount,
            converted_unit = %converted.unit,
            "Converted quantity"
        );
        record_conversion_metrics(Some(rule.from), "converted");
        converted
    }

    /// Scale a quantity by `rule`, rounding at the scale, then simplify
    fn apply_rule(&self, quantity: &Quantity, rule: &ConversionRule) -> Converted {
        let places = self.decimal_places;
        let scale = |value: f64| round_to(rule.scale.apply(value), places);

        match quantity {
            Quantity::Numeric(value) => {
                Converted::from_simplified(self.chains.simplify(scale(*value), rule.to, places))
            }
            Quantity::Range {
                low,
                high,
                separator,
            } => {
                let (low, high) = (scale(*low), scale(*high));
                let simplified = (
                    self.chains.simplify(low, rule.to, places),
                    self.chains.simplify(high, rule.to, places),
                );
                // Keep the simplified unit only when both ends agree on it
                let (low, high, unit) = match simplified {
                    (
                        Simplified::Numeric {
                            value: low,
                            unit: low_unit,
                        },
                        Simplified::Numeric {
                            value: high,
                            unit: high_unit,
                        },
                    ) if low_unit == high_unit => (low, high, low_unit),
                    _ => (low, high, rule.to),
                };
                Converted {
                    amount: Amount::Quantity(Quantity::Range {
                        low,
                        high,
                        separator: *separator,
                    }),
                    unit: unit.label().to_string(),
                }
            }
            Quantity::NotApplicable(_) => {
                Converted::unchanged(quantity.clone(), rule.from.label())
            }
        }
    }

    /// Move an imperial quantity to a larger (or smaller) unit when it crosses a threshold.
    ///
    /// Unknown labels come back unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_units::UnitConverter;
    ///
    /// let converter = UnitConverter::new();
    /// let feet = converter.simplify_units(20.0, "inches");
    /// assert_eq!(feet.amount.to_string(), "1'8''");
    /// assert_eq!(feet.unit, "feet and inches");
    /// ```
    pub fn simplify_units(&self, quantity: f64, unit_label: &str) -> Converted {
        match Unit::from_imperial_label(unit_label) {
            Some(unit) => Converted::from_simplified(self.chains.simplify(
                quantity,
                unit,
                self.decimal_places,
            )),
            None => Converted::unchanged(Quantity::Numeric(quantity), unit_label),
        }
    }

    /// Convert every temperature and measurement in a preparation step
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_units::UnitConverter;
    ///
    /// let converter = UnitConverter::new();
    /// assert_eq!(converter.convert_units_prep("190°-200° C "), "374-392° F ");
    /// assert_eq!(converter.convert_units_prep("1,5 litri"), "1.58 quart");
    /// ```
    pub fn convert_units_prep(&self, step_text: &str) -> String {
        self.convert_text(step_text, ScanMode::Preparation, "convert_units_prep")
    }

    /// Convert number + unit measurements inside an ingredient name
    pub fn convert_units_name(&self, name_text: &str) -> String {
        self.convert_text(name_text, ScanMode::Name, "convert_units_name")
    }

    fn convert_text(&self, text: &str, mode: ScanMode, operation: &str) -> String {
        let _span = conversion_span(operation).entered();
        if !self.scanner.has_measurements(text) {
            return text.to_string();
        }
        let start_time = Instant::now();

        let spans = self.scanner.scan(text, mode, &self.vocabulary);
        let replacements: Vec<(Range<usize>, String)> = spans
            .iter()
            .filter_map(|span| self.render_span(span).map(|text| (span.range(), text)))
            .collect();
        let output = splice(text, &replacements);

        record_text_processing_metrics(operation, start_time.elapsed(), text.len(), spans.len());
        debug!(
            spans = spans.len(),
            replaced = replacements.len(),
            "Converted measurements in text"
        );
        output
    }

    /// Replacement text for a span, or `None` to keep the source text
    fn render_span(&self, span: &MeasurementSpan) -> Option<String> {
        let rule = self.table.rule(span.unit)?;
        let rendered = match span.kind {
            SpanKind::Temperature => {
                let places = self.decimal_places;
                let fahrenheit = span
                    .quantity
                    .map(|value| round_to(rule.scale.apply(value), places));
                format!(
                    "{}{}°{}F",
                    render_quantity(&fahrenheit, &span.separator_text),
                    span.degree_gap,
                    span.unit_gap
                )
            }
            SpanKind::Measurement => {
                let converted = self.apply_rule(&span.quantity, rule);
                match converted.amount {
                    Amount::Mixed(text) => format!("{} {}", text, converted.unit),
                    Amount::Quantity(quantity) => format!(
                        "{}{}{}",
                        render_quantity(&quantity, &span.separator_text),
                        span.unit_gap,
                        converted.unit
                    ),
                    Amount::Text(text) => text,
                }
            }
        };
        trace!(source = %span.source, rendered = %rendered, "Rendered span");
        Some(rendered)
    }

    /// [`convert_units_ing`](Self::convert_units_ing) for loosely typed input.
    ///
    /// Text and numbers are accepted for the quantity, text for the unit, and
    /// `null` stands for `n/a`. Lists, objects and booleans are a type mismatch.
    pub fn convert_ing_value(&self, quantity: &Value, unit: &Value) -> AppResult<Converted> {
        let unit = match unit {
            Value::String(text) => text.as_str(),
            Value::Null => NOT_APPLICABLE,
            other => return Err(type_mismatch("convert_units_ing", "text", other)),
        };
        let quantity = match quantity {
            Value::String(text) => return Ok(self.convert_units_ing(text, unit)),
            Value::Number(number) => number
                .as_f64()
                .map(Quantity::Numeric)
                .unwrap_or_else(|| Quantity::NotApplicable(number.to_string())),
            Value::Null => Quantity::not_applicable(),
            other => return Err(type_mismatch("convert_units_ing", "text or number", other)),
        };
        Ok(self.convert_quantity(quantity, unit))
    }

    /// [`convert_units_prep`](Self::convert_units_prep) for loosely typed input; only text is accepted
    pub fn convert_prep_value(&self, step: &Value) -> AppResult<String> {
        match step {
            Value::String(text) => Ok(self.convert_units_prep(text)),
            other => Err(type_mismatch("convert_units_prep", "text", other)),
        }
    }

    /// [`convert_units_name`](Self::convert_units_name) for loosely typed input; only text is accepted
    pub fn convert_name_value(&self, name: &Value) -> AppResult<String> {
        match name {
            Value::String(text) => Ok(self.convert_units_name(text)),
            other => Err(type_mismatch("convert_units_name", "text", other)),
        }
    }
}

/// Render a converted quantity, joining a range with the separator as written
fn render_quantity(quantity: &Quantity, separator: &str) -> String {
    match quantity {
        Quantity::Range { low, high, .. } if !separator.is_empty() => format!(
            "{}{}{}",
            format_quantity(*low),
            separator,
            format_quantity(*high)
        ),
        other => other.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(operation: &'static str, expected: &str, found: &Value) -> AppError {
    let kind = value_kind(found);
    error_logging::log_type_mismatch(operation, expected, kind);
    record_type_mismatch(operation);
    AppError::TypeMismatch(format!("{} expects {}, got {}", operation, expected, kind))
}
