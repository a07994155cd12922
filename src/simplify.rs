//! # Unit Simplification
//!
//! After conversion a quantity is moved to the unit a cook would write:
//! `50.72 fl oz` becomes `1.58 quart`, `0.66 lb` becomes `10.56 oz` and
//! `20 inches` becomes `1'8''`.
//!
//! ## Chains
//!
//! ```text
//! fl oz --(> 8, ÷ 8)--> cup --(> 4, ÷ 4)--> quart
//! oz    --(> 16, ÷ 16)--> lb
//! lb    --(< 1, × 16)--> oz
//! inches --(≥ 12)--> feet and inches
//! ```
//!
//! The cascade runs on unrounded values and rounds once at the end, so
//! `50 fl oz` gives `round(50 / 32)` rather than `round(round(50 / 8) / 4)`.

use std::collections::{HashMap, HashSet};
use tracing::trace;

use crate::errors::{AppError, AppResult};
use crate::formatting::{format_quantity, round_to};
use crate::units::Unit;

/// Unit label used for mixed notation with a non-zero inch remainder
pub const FEET_AND_INCHES_LABEL: &str = "feet and inches";

const INCHES_PER_FOOT: f64 = 12.0;

/// What happens to a quantity expressed in a given unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimplificationStep {
    /// Move to a larger unit once the value exceeds `above`
    Promote { above: f64, divisor: f64, to: Unit },
    /// Move to a smaller unit while the value is below `below`
    Demote { below: f64, multiplier: f64, to: Unit },
    /// Render as `<feet>'<inches>''` once the value reaches `at_least` inches
    FeetAndInches { at_least: f64 },
}

/// Result of simplification: a plain number, or mixed feet-and-inches text
#[derive(Debug, Clone, PartialEq)]
pub enum Simplified {
    Numeric { value: f64, unit: Unit },
    Mixed { text: String, label: &'static str },
}

impl Simplified {
    pub fn label(&self) -> &'static str {
        match self {
            Simplified::Numeric { unit, .. } => unit.label(),
            Simplified::Mixed { label, .. } => label,
        }
    }
}

/// Immutable set of simplification steps, at most one per unit
#[derive(Debug, Clone)]
pub struct SimplificationChains {
    steps: HashMap<Unit, SimplificationStep>,
}

impl Default for SimplificationChains {
    fn default() -> Self {
        let mut steps = HashMap::new();
        steps.insert(
            Unit::FluidOunce,
            SimplificationStep::Promote {
                above: 8.0,
                divisor: 8.0,
                to: Unit::Cup,
            },
        );
        steps.insert(
            Unit::Cup,
            SimplificationStep::Promote {
                above: 4.0,
                divisor: 4.0,
                to: Unit::Quart,
            },
        );
        steps.insert(
            Unit::Ounce,
            SimplificationStep::Promote {
                above: 16.0,
                divisor: 16.0,
                to: Unit::Pound,
            },
        );
        steps.insert(
            Unit::Pound,
            SimplificationStep::Demote {
                below: 1.0,
                multiplier: 16.0,
                to: Unit::Ounce,
            },
        );
        steps.insert(
            Unit::Inch,
            SimplificationStep::FeetAndInches {
                at_least: INCHES_PER_FOOT,
            },
        );
        Self { steps }
    }
}

impl SimplificationChains {
    pub fn from_steps(steps: impl IntoIterator<Item = (Unit, SimplificationStep)>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    pub fn step(&self, unit: Unit) -> Option<&SimplificationStep> {
        self.steps.get(&unit)
    }

    /// Cascade `value` through the chain starting at `unit`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_units::simplify::{SimplificationChains, Simplified};
    /// use recipe_units::units::Unit;
    ///
    /// let chains = SimplificationChains::default();
    /// assert_eq!(
    ///     chains.simplify(10.0, Unit::FluidOunce, 2),
    ///     Simplified::Numeric { value: 1.25, unit: Unit::Cup }
    /// );
    /// ```
    pub fn simplify(&self, value: f64, unit: Unit, places: u32) -> Simplified {
        let mut value = value;
        let mut unit = unit;

        // Each step can fire at most once, so the cascade always terminates.
        for _ in 0..=self.steps.len() {
            match self.steps.get(&unit) {
                Some(SimplificationStep::Promote { above, divisor, to }) if value > *above => {
                    trace!(value, from = ?unit, to = ?to, "Promoting quantity");
                    value /= divisor;
                    unit = *to;
                }
                Some(SimplificationStep::Demote {
                    below,
                    multiplier,
                    to,
                }) if value < *below => {
                    trace!(value, from = ?unit, to = ?to, "Demoting quantity");
                    value *= multiplier;
                    unit = *to;
                }
                Some(SimplificationStep::FeetAndInches { at_least }) if value >= *at_least => {
                    return feet_and_inches(value, places);
                }
                _ => break,
            }
        }

        Simplified::Numeric {
            value: round_to(value, places),
            unit,
        }
    }

    /// Check that promotions grow, demotions shrink and promotion chains end
    pub fn validate(&self) -> AppResult<()> {
        for (unit, step) in &self.steps {
            match step {
                SimplificationStep::Promote { divisor, .. } if *divisor <= 1.0 => {
                    return Err(AppError::Config(format!(
                        "promotion from {:?} must divide by more than 1",
                        unit
                    )));
                }
                SimplificationStep::Demote { multiplier, .. } if *multiplier <= 1.0 => {
                    return Err(AppError::Config(format!(
                        "demotion from {:?} must multiply by more than 1",
                        unit
                    )));
                }
                _ => {}
            }

            let mut seen = HashSet::from([*unit]);
            let mut current = *unit;
            while let Some(SimplificationStep::Promote { to, .. }) = self.steps.get(&current) {
                if !seen.insert(*to) {
                    return Err(AppError::Config(format!(
                        "promotion chain starting at {:?} loops back to {:?}",
                        unit, to
                    )));
                }
                current = *to;
            }
        }
        Ok(())
    }
}

fn feet_and_inches(inches: f64, places: u32) -> Simplified {
    let mut feet = (inches / INCHES_PER_FOOT).floor();
    let mut remainder = round_to(inches - feet * INCHES_PER_FOOT, places);
    if remainder >= INCHES_PER_FOOT {
        feet += 1.0;
        remainder = round_to(remainder - INCHES_PER_FOOT, places);
    }

    if remainder == 0.0 {
        Simplified::Mixed {
            text: format!("{}'", format_quantity(feet)),
            label: Unit::Foot.label(),
        }
    } else {
        Simplified::Mixed {
            text: format!("{}'{}''", format_quantity(feet), format_quantity(remainder)),
            label: FEET_AND_INCHES_LABEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chains() -> SimplificationChains {
        SimplificationChains::default()
    }

    #[test]
    fn test_pound_below_one_becomes_ounces() {
        assert_eq!(
            chains().simplify(0.4, Unit::Pound, 2),
            Simplified::Numeric {
                value: 6.4,
                unit: Unit::Ounce
            }
        );
        assert_eq!(
            chains().simplify(5.95, Unit::Pound, 2),
            Simplified::Numeric {
                value: 5.95,
                unit: Unit::Pound
            }
        );
    }

    #[test]
    fn test_fluid_ounce_boundaries() {
        assert_eq!(
            chains().simplify(8.0, Unit::FluidOunce, 2),
            Simplified::Numeric {
                value: 8.0,
                unit: Unit::FluidOunce
            }
        );
        assert_eq!(
            chains().simplify(10.0, Unit::FluidOunce, 2),
            Simplified::Numeric {
                value: 1.25,
                unit: Unit::Cup
            }
        );
        assert_eq!(
            chains().simplify(32.0, Unit::FluidOunce, 2),
            Simplified::Numeric {
                value: 4.0,
                unit: Unit::Cup
            }
        );
        assert_eq!(
            chains().simplify(50.0, Unit::FluidOunce, 2),
            Simplified::Numeric {
                value: 1.56,
                unit: Unit::Quart
            }
        );
    }

    #[test]
    fn test_ounce_promotes_to_pound() {
        assert_eq!(
            chains().simplify(20.0, Unit::Ounce, 2),
            Simplified::Numeric {
                value: 1.25,
                unit: Unit::Pound
            }
        );
        assert_eq!(
            chains().simplify(16.0, Unit::Ounce, 2),
            Simplified::Numeric {
                value: 16.0,
                unit: Unit::Ounce
            }
        );
    }

    #[test]
    fn test_quart_is_top_of_chain() {
        assert_eq!(
            chains().simplify(100.0, Unit::Quart, 2),
            Simplified::Numeric {
                value: 100.0,
                unit: Unit::Quart
            }
        );
    }

    #[test]
    fn test_feet_and_inches() {
        assert_eq!(
            chains().simplify(20.0, Unit::Inch, 2),
            Simplified::Mixed {
                text: "1'8''".to_string(),
                label: FEET_AND_INCHES_LABEL
            }
        );
        assert_eq!(
            chains().simplify(12.0, Unit::Inch, 2),
            Simplified::Mixed {
                text: "1'".to_string(),
                label: "feet"
            }
        );
        assert_eq!(
            chains().simplify(19.68, Unit::Inch, 2),
            Simplified::Mixed {
                text: "1'7.68''".to_string(),
                label: FEET_AND_INCHES_LABEL
            }
        );
        assert_eq!(
            chains().simplify(11.81, Unit::Inch, 2),
            Simplified::Numeric {
                value: 11.81,
                unit: Unit::Inch
            }
        );
    }

    #[test]
    fn test_remainder_rounding_carries_into_feet() {
        assert_eq!(
            chains().simplify(23.999, Unit::Inch, 2),
            Simplified::Mixed {
                text: "2'".to_string(),
                label: "feet"
            }
        );
    }

    #[test]
    fn test_units_without_chain_are_rounded_only() {
        assert_eq!(
            chains().simplify(374.0, Unit::Fahrenheit, 2),
            Simplified::Numeric {
                value: 374.0,
                unit: Unit::Fahrenheit
            }
        );
    }

    #[test]
    fn test_validate() {
        assert!(chains().validate().is_ok());

        let looping = SimplificationChains::from_steps([
            (
                Unit::Cup,
                SimplificationStep::Promote {
                    above: 4.0,
                    divisor: 4.0,
                    to: Unit::Quart,
                },
            ),
            (
                Unit::Quart,
                SimplificationStep::Promote {
                    above: 4.0,
                    divisor: 4.0,
                    to: Unit::Cup,
                },
            ),
        ]);
        assert!(looping.validate().is_err());
    }
}
