//! Configuration validation errors and semantic validation.

use std::collections::HashSet;

use num::{One, Zero};
use thiserror::Error;

use crate::scenario::ScenarioConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid exact value {input:?}: {message}")]
    InvalidNumber { input: String, message: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidNumber { .. } => 62,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a scenario configuration semantically.
pub fn validate_scenario(config: &ScenarioConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    validate_unit_interval("prevalence", config.prevalence.value())?;
    validate_unit_interval("sensitivity", config.sensitivity.value())?;

    if config.false_positive_rates.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "false_positive_rates".to_string(),
            message: "At least one rate hypothesis is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    let mut prior_mass = num::BigRational::zero();
    for (i, hypothesis) in config.false_positive_rates.iter().enumerate() {
        let field = format!("false_positive_rates[{}]", i);
        validate_unit_interval(&format!("{}.rate", field), hypothesis.rate.value())?;

        let prior = hypothesis.prior.value();
        if prior < &num::BigRational::zero() {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.prior", field),
                message: format!("Must be non-negative, got {}", prior),
            });
        }
        prior_mass += prior.clone();

        // Conditional lookups by rate need one sub-model per rate.
        if !seen.insert(hypothesis.rate.value().clone()) {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.rate", field),
                message: format!("Duplicate rate {}", hypothesis.rate),
            });
        }
    }

    if prior_mass.is_zero() {
        return Err(ValidationError::InvalidValue {
            field: "false_positive_rates".to_string(),
            message: "Prior weights must not all be zero".to_string(),
        });
    }

    Ok(())
}

fn validate_unit_interval(field: &str, value: &num::BigRational) -> ValidationResult<()> {
    if value < &num::BigRational::zero() || value > &num::BigRational::one() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in [0, 1], got {}", value),
        });
    }
    Ok(())
}
