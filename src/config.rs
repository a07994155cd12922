//! # Configuration Management
//!
//! Environment-driven settings for the converter, plus the optional JSON file
//! of extra unit spellings.
//!
//! ## Environment variables
//!
//! - `ENVIRONMENT`: `development` (pretty logs) or anything else (JSON logs)
//! - `LOG_LEVEL`: level for the `recipe_units` target, default `info`
//! - `UNIT_DECIMAL_PLACES`: rounding precision, 0-6, default 2
//! - `UNIT_ALIASES_CONFIG_PATH`: path to a unit aliases JSON file
//!
//! ## Unit aliases file
//!
//! ```json
//! {
//!   "unit_aliases": {
//!     "gram": ["grm", "grammi."],
//!     "liter": ["ltr"]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use tracing::info;

use crate::errors::{error_logging, AppError, AppResult};
use crate::units::Unit;

/// Default rounding precision applied at conversion time
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

const MAX_DECIMAL_PLACES: u32 = 6;

/// Converter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Environment name (development, staging, production)
    pub environment: String,
    /// Log level for the crate's own targets
    pub log_level: String,
    /// Decimal places kept when a scale is applied
    pub decimal_places: u32,
    /// Optional JSON file with extra unit aliases
    pub unit_aliases_path: Option<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
            unit_aliases_path: None,
        }
    }
}

impl ConverterConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            decimal_places: env::var("UNIT_DECIMAL_PLACES")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_DECIMAL_PLACES),
            unit_aliases_path: env::var("UNIT_ALIASES_CONFIG_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty()),
        }
    }

    /// Check if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Validate configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(AppError::Config(format!(
                "decimal_places cannot be greater than {}",
                MAX_DECIMAL_PLACES
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "log_level '{}' is not one of {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        if let Some(path) = &self.unit_aliases_path {
            if path.trim().is_empty() {
                return Err(AppError::Config(
                    "unit_aliases_path cannot be empty if provided".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Extra unit spellings loaded from JSON
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UnitAliasesConfig {
    pub unit_aliases: HashMap<Unit, Vec<String>>,
}

impl UnitAliasesConfig {
    /// Validate unit aliases configuration
    pub fn validate(&self) -> AppResult<()> {
        for (unit, aliases) in &self.unit_aliases {
            if !unit.is_metric() {
                return Err(AppError::Config(format!(
                    "aliases can only be declared for metric units, got {:?}",
                    unit
                )));
            }
            for (i, alias) in aliases.iter().enumerate() {
                if alias.trim().is_empty() {
                    return Err(AppError::Config(format!(
                        "unit_aliases.{:?}[{}] cannot be empty",
                        unit, i
                    )));
                }
                if alias.chars().any(|c| c.is_control()) {
                    return Err(AppError::Config(format!(
                        "unit_aliases.{:?}[{}] '{}' contains control characters",
                        unit, i, alias
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Load and validate a unit aliases file
pub fn load_unit_aliases_config(path: &str) -> AppResult<UnitAliasesConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        error_logging::log_config_error(&e, "read_unit_aliases", Some(path));
        AppError::FileSystem(format!("failed to read unit aliases from '{}': {}", path, e))
    })?;

    let config: UnitAliasesConfig = serde_json::from_str(&content).map_err(|e| {
        error_logging::log_config_error(&e, "parse_unit_aliases", Some(path));
        AppError::Parse(format!("failed to parse unit aliases from '{}': {}", path, e))
    })?;

    config.validate()?;
    info!(
        path = %path,
        units = config.unit_aliases.len(),
        "Loaded unit aliases config"
    );
    Ok(config)
}
