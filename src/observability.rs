//! Observability setup: structured logging and conversion metrics.
//!
//! This module provides:
//! - Tracing subscriber initialization (pretty in development, JSON otherwise)
//! - Metrics recording for text scanning and unit conversion
//!
//! Metrics go through the `metrics` facade and are no-ops until the host
//! application installs a recorder.

use anyhow::Result;
use tracing_subscriber::prelude::*;

use crate::config::ConverterConfig;
use crate::units::Unit;

/// Initialize structured logging with tracing and configuration
pub fn init_tracing(config: &ConverterConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("recipe_units={}", config.log_level).parse()?);

    if config.is_development()
        || std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()) == "pretty"
    {
        // Pretty formatting for development
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        // JSON formatting for production (default)
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Create a span for conversion operations
pub fn conversion_span(operation: &str) -> tracing::Span {
    tracing::debug_span!(
        "conversion_operation",
        operation = operation,
        component = "units"
    )
}

/// Record text scanning metrics
pub fn record_text_processing_metrics(
    operation: &str,
    duration: std::time::Duration,
    text_length: usize,
    spans_found: usize,
) {
    let operation = operation.to_string();
    metrics::counter!("text_processing_operations_total", "operation" => operation.clone())
        .increment(1);
    metrics::histogram!("text_processing_duration_seconds", "operation" => operation.clone())
        .record(duration.as_secs_f64());
    metrics::histogram!("text_processing_input_length", "operation" => operation.clone())
        .record(text_length as f64);
    metrics::histogram!("text_processing_spans_found", "operation" => operation)
        .record(spans_found as f64);
}

/// Record the outcome of a single unit conversion; unresolved units share one label
pub fn record_conversion_metrics(unit: Option<Unit>, outcome: &'static str) {
    metrics::counter!(
        "unit_conversions_total",
        "unit" => unit.map_or("unknown", Unit::label),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a rejected input
pub fn record_type_mismatch(operation: &'static str) {
    metrics::counter!("conversion_type_mismatch_total", "operation" => operation).increment(1);
}
