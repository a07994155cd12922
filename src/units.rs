//! # Units and Unit Vocabulary
//!
//! The closed set of units the engine understands, and the alias table that
//! maps the spellings found on Italian and English recipe pages onto metric
//! units. Anything outside the vocabulary is opaque and passes through.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

/// A recognized measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Gram,
    Kilogram,
    Milliliter,
    Centiliter,
    Deciliter,
    Liter,
    Millimeter,
    Centimeter,
    Celsius,
    Ounce,
    Pound,
    FluidOunce,
    Cup,
    Quart,
    Inch,
    Foot,
    Fahrenheit,
}

/// Which side of the conversion a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl Unit {
    /// Every metric unit; each one must have a conversion rule
    pub const METRIC: [Unit; 9] = [
        Unit::Gram,
        Unit::Kilogram,
        Unit::Milliliter,
        Unit::Centiliter,
        Unit::Deciliter,
        Unit::Liter,
        Unit::Millimeter,
        Unit::Centimeter,
        Unit::Celsius,
    ];

    pub fn system(self) -> UnitSystem {
        match self {
            Unit::Gram
            | Unit::Kilogram
            | Unit::Milliliter
            | Unit::Centiliter
            | Unit::Deciliter
            | Unit::Liter
            | Unit::Millimeter
            | Unit::Centimeter
            | Unit::Celsius => UnitSystem::Metric,
            Unit::Ounce
            | Unit::Pound
            | Unit::FluidOunce
            | Unit::Cup
            | Unit::Quart
            | Unit::Inch
            | Unit::Foot
            | Unit::Fahrenheit => UnitSystem::Imperial,
        }
    }

    pub fn is_metric(self) -> bool {
        self.system() == UnitSystem::Metric
    }

    /// The label written next to a quantity in converted output
    pub fn label(self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Centiliter => "cl",
            Unit::Deciliter => "dl",
            Unit::Liter => "l",
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Celsius => "° C",
            Unit::Ounce => "oz",
            Unit::Pound => "lb",
            Unit::FluidOunce => "fl oz",
            Unit::Cup => "cup",
            Unit::Quart => "quart",
            Unit::Inch => "inches",
            Unit::Foot => "feet",
            Unit::Fahrenheit => "° F",
        }
    }

    /// Resolve an imperial label as accepted by the simplifier.
    ///
    /// `oz` is the mass ounce; the volume chain starts from `fl oz`.
    pub fn from_imperial_label(label: &str) -> Option<Unit> {
        let normalized = label.trim().to_lowercase();
        let unit = match normalized.trim_end_matches('.') {
            "oz" | "ounce" | "ounces" => Unit::Ounce,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Pound,
            "fl oz" | "fl. oz" | "fluid ounce" | "fluid ounces" => Unit::FluidOunce,
            "cup" | "cups" => Unit::Cup,
            "quart" | "quarts" | "qt" => Unit::Quart,
            "inches" | "inch" | "in" => Unit::Inch,
            "feet" | "foot" | "ft" => Unit::Foot,
            "° f" | "°f" | "fahrenheit" => Unit::Fahrenheit,
            _ => return None,
        };
        Some(unit)
    }
}

/// Default spellings for each metric unit
fn default_aliases() -> Vec<(Unit, &'static [&'static str])> {
    vec![
        (
            Unit::Gram,
            &[
                "g", "gr", "grammo", "grammi", "gram", "grams", "gramme", "grammes",
            ][..],
        ),
        (
            Unit::Kilogram,
            &[
                "kg",
                "kilo",
                "chilo",
                "chilogrammo",
                "chilogrammi",
                "kilogrammo",
                "kilogrammi",
                "kilogram",
                "kilograms",
            ][..],
        ),
        (
            Unit::Milliliter,
            &[
                "ml",
                "millilitro",
                "millilitri",
                "milliliter",
                "milliliters",
                "millilitre",
                "millilitres",
            ][..],
        ),
        (Unit::Centiliter, &["cl", "centilitro", "centilitri"][..]),
        (Unit::Deciliter, &["dl", "decilitro", "decilitri"][..]),
        (
            Unit::Liter,
            &[
                "l", "lt", "litro", "litri", "liter", "liters", "litre", "litres",
            ][..],
        ),
        (
            Unit::Millimeter,
            &["mm", "millimetro", "millimetri", "millimeter", "millimeters"][..],
        ),
        (
            Unit::Centimeter,
            &["cm", "centimetro", "centimetri", "centimeter", "centimeters"][..],
        ),
        (Unit::Celsius, &["°c", "° c", "celsius", "gradi"][..]),
    ]
}

/// Alias lookup from source-text unit tokens to metric units
#[derive(Debug, Clone)]
pub struct UnitVocabulary {
    aliases: HashMap<String, Unit>,
}

impl Default for UnitVocabulary {
    fn default() -> Self {
        let mut aliases = HashMap::new();
        for (unit, spellings) in default_aliases() {
            for spelling in spellings {
                aliases.insert(spelling.to_string(), unit);
            }
        }
        Self { aliases }
    }
}

impl UnitVocabulary {
    /// Add extra spellings for a unit; keys are stored lowercase
    pub fn extend<I, S>(&mut self, unit: Unit, spellings: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for spelling in spellings {
            let key = spelling.as_ref().trim().to_lowercase();
            debug!(alias = %key, unit = ?unit, "Registering unit alias");
            self.aliases.insert(key, unit);
        }
    }

    /// Resolve a unit token, ignoring case, surrounding whitespace and a trailing dot
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_units::units::{Unit, UnitVocabulary};
    ///
    /// let vocabulary = UnitVocabulary::default();
    /// assert_eq!(vocabulary.resolve("Gr."), Some(Unit::Gram));
    /// assert_eq!(vocabulary.resolve("litri"), Some(Unit::Liter));
    /// assert_eq!(vocabulary.resolve("n/a"), None);
    /// ```
    pub fn resolve(&self, token: &str) -> Option<Unit> {
        let normalized = token.trim().to_lowercase();
        let key = normalized.trim_end_matches('.');
        let unit = self.aliases.get(key).copied();
        trace!(token = %token, unit = ?unit, "Resolved unit token");
        unit
    }

    /// Aliases usable in prose patterns, longest first so that `grammi`
    /// wins over `gr` and `g`. Temperature spellings are handled separately.
    pub fn measurement_tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, unit)| **unit != Unit::Celsius)
            .map(|(alias, _)| alias.as_str())
            .filter(|alias| !alias.ends_with('.'))
            .collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        tokens
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
