//! # Text Processing Module
//!
//! Finds metric measurements embedded in free text (preparation steps,
//! ingredient names) and reports them as [`MeasurementSpan`]s with exact byte
//! offsets. Replacement is done by [`splice`], which rebuilds the string from
//! the original text and the non-overlapping spans, so converted output is
//! never scanned a second time.
//!
//! ## Features
//!
//! - Temperature expressions: `180°C`, `190°-200° C`, `190-200 °C`, `-18°C`
//! - Number + unit, with or without a space on the same line: `300g`, `1,5 litri`
//! - Ranges joined by `-`, `–` or the Italian `o`: `15,5-20,2 cm`, `5 o 6 g`
//! - Unit pattern built from the [`UnitVocabulary`], longest alias first
//!
//! A unit letter followed by an apostrophe is an elided article (`2 l'impasto`)
//! and never a measurement.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::ops::Range;
use tracing::{debug, trace};

use crate::quantity::{parse_number, Quantity, RangeSeparator};
use crate::units::{Unit, UnitVocabulary};

/// Digits with optional `.`/`,` groups; interpreted by [`parse_number`]
const NUMBER_PATTERN: &str = r"\d+(?:[.,]\d+)*";

lazy_static! {
    static ref TEMPERATURE_REGEX: Regex = Regex::new(&format!(
        r"(?P<low>[-−]?\b{n})(?:(?P<sep>[ \t]*[°º]?[ \t]*[-–][ \t]*|[ \t]+o[ \t]+)(?P<high>[-−]?{n}))?(?P<pre>[ \t]*)[°º](?P<gap>[ \t]*)[Cc]\b",
        n = NUMBER_PATTERN
    ))
    .expect("Temperature pattern should be valid");
    static ref DEFAULT_MEASUREMENT_REGEX: Regex =
        Regex::new(&build_measurement_regex_pattern(&UnitVocabulary::default()))
            .expect("Default measurement pattern should be valid");
}

/// Which pattern produced a span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Temperature,
    Measurement,
}

/// Which patterns to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Preparation steps: temperatures, then number + unit
    Preparation,
    /// Ingredient names: number + unit only
    Name,
}

/// A measurement located in source text
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSpan {
    /// Byte offset of the first character of the match
    pub start: usize,
    /// Byte offset one past the match
    pub end: usize,
    /// The matched text, e.g. `"1,5 litri"`
    pub source: String,
    pub kind: SpanKind,
    pub quantity: Quantity,
    pub unit: Unit,
    /// The unit as written, e.g. `"litri"`
    pub unit_token: String,
    /// Whitespace between the number and the unit (or between `°` and `C`)
    pub unit_gap: String,
    /// Whitespace between the number and `°`; empty for plain measurements
    pub degree_gap: String,
    /// Range separator as written, without degree signs; empty for single values
    pub separator_text: String,
}

impl MeasurementSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_range(&self) -> bool {
        matches!(self.quantity, Quantity::Range { .. })
    }

    fn overlaps(&self, other: &MeasurementSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Build the number + unit regex for a vocabulary.
///
/// ```text
/// (?i)\b(?P<low>NUM)(?:(?P<sep>-|o)(?P<high>NUM))?(?P<gap>[ \t]*)(?P<unit>grammi|litri|...|g|l)\b
/// ```
///
/// Aliases are escaped and sorted longest first so `grammi` is preferred over
/// `gr` and `g`. The trailing `\b` keeps `l` from matching the start of `lb`,
/// which is what makes converted output stable under a second pass.
pub fn build_measurement_regex_pattern(vocabulary: &UnitVocabulary) -> String {
    let units_pattern = vocabulary
        .measurement_tokens()
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");

    format!(
        r"(?i)\b(?P<low>{n})(?:(?P<sep>[ \t]*[-–][ \t]*|[ \t]+o[ \t]+)(?P<high>{n}))?(?P<gap>[ \t]*)(?P<unit>{units})\b",
        n = NUMBER_PATTERN,
        units = units_pattern
    )
}

/// Measurement scanner over prose using vocabulary-driven regex patterns
#[derive(Debug, Clone)]
pub struct MeasurementScanner {
    /// Compiled number + unit pattern
    pattern: Regex,
}

impl MeasurementScanner {
    /// Scanner for the default vocabulary; the pattern is compiled once per process
    pub fn new() -> Self {
        Self {
            pattern: DEFAULT_MEASUREMENT_REGEX.clone(),
        }
    }

    /// Scanner for a custom vocabulary
    pub fn with_vocabulary(vocabulary: &UnitVocabulary) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&build_measurement_regex_pattern(vocabulary))?;
        debug!(aliases = vocabulary.len(), "Built measurement pattern");
        Ok(Self { pattern })
    }

    /// Check whether `text` contains a number directly followed by a known unit
    pub fn has_measurements(&self, text: &str) -> bool {
        self.pattern.is_match(text) || TEMPERATURE_REGEX.is_match(text)
    }

    /// Locate every convertible measurement in `text`, ordered by offset.
    ///
    /// Temperature spans take precedence; number + unit matches overlapping
    /// one are dropped. Matches whose numbers cannot be parsed are skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_units::text_processing::{MeasurementScanner, ScanMode, SpanKind};
    /// use recipe_units::units::{Unit, UnitVocabulary};
    ///
    /// let scanner = MeasurementScanner::new();
    /// let vocabulary = UnitVocabulary::default();
    /// let spans = scanner.scan("Cuocere a 180°C con 300g di zucchero", ScanMode::Preparation, &vocabulary);
    ///
    /// assert_eq!(spans.len(), 2);
    /// assert_eq!(spans[0].kind, SpanKind::Temperature);
    /// assert_eq!(spans[1].source, "300g");
    /// assert_eq!(spans[1].unit, Unit::Gram);
    /// ```
    pub fn scan(
        &self,
        text: &str,
        mode: ScanMode,
        vocabulary: &UnitVocabulary,
    ) -> Vec<MeasurementSpan> {
        let mut spans: Vec<MeasurementSpan> = Vec::new();

        if mode == ScanMode::Preparation {
            spans.extend(
                TEMPERATURE_REGEX
                    .captures_iter(text)
                    .filter_map(|captures| temperature_span(&captures)),
            );
        }

        let temperature_count = spans.len();
        for captures in self.pattern.captures_iter(text) {
            let Some(span) = measurement_span(&captures, text, vocabulary) else {
                continue;
            };
            if spans[..temperature_count]
                .iter()
                .any(|existing| existing.overlaps(&span))
            {
                trace!(source = %span.source, "Skipping measurement inside temperature");
                continue;
            }
            spans.push(span);
        }

        spans.sort_by_key(|span| span.start);
        debug!(
            spans = spans.len(),
            mode = ?mode,
            "Scanned text for measurements"
        );
        spans
    }
}

impl Default for MeasurementScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn captured_quantity(captures: &Captures) -> Option<Quantity> {
    let low = parse_number(captures.name("low")?.as_str())?;
    match (captures.name("high"), captures.name("sep")) {
        (Some(high), Some(separator)) => Some(Quantity::Range {
            low,
            high: parse_number(high.as_str())?,
            separator: RangeSeparator::from_text(separator.as_str()),
        }),
        _ => Some(Quantity::Numeric(low)),
    }
}

fn separator_text(captures: &Captures) -> String {
    captures
        .name("sep")
        .map(|separator| separator.as_str().replace(|c: char| c == '°' || c == 'º', ""))
        .unwrap_or_default()
}

/// In a comma list such as `1,2,3 g` only the last item carries the unit
fn trailing_list_item(captures: &Captures) -> Option<(usize, Quantity)> {
    if captures.name("high").is_some() {
        return None;
    }
    let low = captures.name("low")?;
    let offset = low.as_str().rfind(',')? + 1;
    let value = parse_number(&low.as_str()[offset..])?;
    Some((low.start() + offset, Quantity::Numeric(value)))
}

fn temperature_span(captures: &Captures) -> Option<MeasurementSpan> {
    let full = captures.get(0)?;
    let quantity = captured_quantity(captures)?;
    trace!(source = %full.as_str(), "Found temperature");
    Some(MeasurementSpan {
        start: full.start(),
        end: full.end(),
        source: full.as_str().to_string(),
        kind: SpanKind::Temperature,
        quantity,
        unit: Unit::Celsius,
        unit_token: "C".to_string(),
        unit_gap: captures.name("gap")?.as_str().to_string(),
        degree_gap: captures.name("pre")?.as_str().to_string(),
        separator_text: separator_text(captures),
    })
}

fn measurement_span(
    captures: &Captures,
    text: &str,
    vocabulary: &UnitVocabulary,
) -> Option<MeasurementSpan> {
    let full = captures.get(0)?;
    if text[full.end()..].starts_with(|c: char| c == '\'' || c == '’') {
        trace!(source = %full.as_str(), "Skipping elided article");
        return None;
    }

    let unit_token = captures.name("unit")?.as_str();
    let unit = vocabulary.resolve(unit_token)?;
    let (start, quantity) = match captured_quantity(captures) {
        Some(quantity) => (full.start(), quantity),
        None => trailing_list_item(captures)?,
    };
    let source = &text[start..full.end()];
    trace!(source = %source, unit = ?unit, "Found measurement");
    Some(MeasurementSpan {
        start,
        end: full.end(),
        source: source.to_string(),
        kind: SpanKind::Measurement,
        quantity,
        unit,
        unit_token: unit_token.to_string(),
        unit_gap: captures.name("gap")?.as_str().to_string(),
        degree_gap: String::new(),
        separator_text: separator_text(captures),
    })
}

/// Rebuild `text` with each byte range replaced by its new text.
///
/// Replacements must be sorted by start offset and must not overlap; text
/// outside them is copied unchanged.
pub fn splice(text: &str, replacements: &[(Range<usize>, String)]) -> String {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for (range, replacement) in replacements {
        if range.start < cursor || range.end > text.len() {
            continue;
        }
        output.push_str(&text[cursor..range.start]);
        output.push_str(replacement);
        cursor = range.end;
    }
    output.push_str(&text[cursor..]);
    output
}
