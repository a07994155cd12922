//! # Unit Conversion Table
//!
//! One rule per metric unit: the imperial target and the scale that gets
//! there. Mass lands on pounds and volume on fluid ounces; the simplifier then
//! moves the result to the most readable unit.

use std::collections::HashMap;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::units::Unit;

/// How a metric value maps onto its imperial target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    Linear(f64),
    Affine { factor: f64, offset: f64 },
}

impl Scale {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Scale::Linear(factor) => value * factor,
            Scale::Affine { factor, offset } => value * factor + offset,
        }
    }

    /// Undo the scale, used to check conversions in tests and diagnostics
    pub fn invert(&self, value: f64) -> f64 {
        match self {
            Scale::Linear(factor) => value / factor,
            Scale::Affine { factor, offset } => (value - offset) / factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRule {
    pub from: Unit,
    pub to: Unit,
    pub scale: Scale,
}

/// Immutable registry of conversion rules keyed by metric unit
#[derive(Debug, Clone)]
pub struct ConversionTable {
    rules: HashMap<Unit, ConversionRule>,
}

impl Default for ConversionTable {
    fn default() -> Self {
        let rules = [
            (Unit::Gram, Unit::Pound, Scale::Linear(0.00220462)),
            (Unit::Kilogram, Unit::Pound, Scale::Linear(2.205)),
            (Unit::Milliliter, Unit::FluidOunce, Scale::Linear(0.033814)),
            (Unit::Centiliter, Unit::FluidOunce, Scale::Linear(0.33814)),
            (Unit::Deciliter, Unit::FluidOunce, Scale::Linear(3.3814)),
            (Unit::Liter, Unit::FluidOunce, Scale::Linear(33.814)),
            (Unit::Millimeter, Unit::Inch, Scale::Linear(0.03937)),
            (Unit::Centimeter, Unit::Inch, Scale::Linear(0.3937)),
            (
                Unit::Celsius,
                Unit::Fahrenheit,
                Scale::Affine {
                    factor: 9.0 / 5.0,
                    offset: 32.0,
                },
            ),
        ];

        Self {
            rules: rules
                .into_iter()
                .map(|(from, to, scale)| (from, ConversionRule { from, to, scale }))
                .collect(),
        }
    }
}

impl ConversionTable {
    /// Build a table, rejecting a second rule for the same unit
    pub fn from_rules(rules: impl IntoIterator<Item = ConversionRule>) -> AppResult<Self> {
        let mut table = HashMap::new();
        for rule in rules {
            if table.insert(rule.from, rule).is_some() {
                return Err(AppError::Config(format!(
                    "duplicate conversion rule for {:?}",
                    rule.from
                )));
            }
        }
        Ok(Self { rules: table })
    }

    pub fn rule(&self, unit: Unit) -> Option<&ConversionRule> {
        self.rules.get(&unit)
    }

    /// Check that every metric unit has exactly one rule pointing at an imperial unit
    pub fn validate(&self) -> AppResult<()> {
        for unit in Unit::METRIC {
            let rule = self.rules.get(&unit).ok_or_else(|| {
                AppError::Config(format!("no conversion rule for metric unit {:?}", unit))
            })?;
            if rule.to.is_metric() {
                return Err(AppError::Config(format!(
                    "conversion rule for {:?} targets metric unit {:?}",
                    unit, rule.to
                )));
            }
        }

        if let Some(rule) = self.rules.values().find(|rule| !rule.from.is_metric()) {
            return Err(AppError::Config(format!(
                "conversion rule declared for imperial unit {:?}",
                rule.from
            )));
        }

        debug!(rules = self.rules.len(), "Conversion table validated");
        Ok(())
    }
}
