//! # Recipe Units
//!
//! Converts the metric measurements found in extracted recipe data
//! (ingredient quantities, ingredient names, preparation steps) into imperial
//! units, leaving everything it does not recognize untouched.

pub mod config;
pub mod conversion_table;
pub mod converter;
pub mod errors;
pub mod formatting;
pub mod observability;
pub mod quantity;
pub mod recipe;
pub mod simplify;
pub mod text_processing;
pub mod units;

// Re-export types for easier access
pub use converter::{Amount, Converted, UnitConverter};
pub use formatting::float_dot_zero;
pub use quantity::{parse_quantity, Quantity, RangeSeparator};
pub use recipe::{Ingredient, Recipe};
pub use text_processing::{MeasurementScanner, MeasurementSpan};
pub use units::Unit;
