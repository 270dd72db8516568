//! Error types for scenario inference.

use mt_config::ValidationError;
use mt_math::PmfError;
use thiserror::Error;

/// Result alias for mt-core operations.
pub type Result<T> = std::result::Result<T, InferenceError>;

/// Errors raised while building models or applying evidence.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Distribution error: {0}")]
    Pmf(#[from] PmfError),

    #[error("Configuration error: {0}")]
    Config(#[from] ValidationError),

    #[error("Patient index {index} out of range for a cohort of {size}")]
    PatientOutOfRange { index: usize, size: usize },

    #[error("Cohort of {size} patients exceeds the limit of {max}")]
    CohortTooLarge { size: usize, max: usize },

    #[error("Scenario {scenario} needs at least one test result")]
    EmptyCohort { scenario: String },
}

impl InferenceError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            InferenceError::Pmf(PmfError::InvalidWeight { .. }) => 20,
            InferenceError::Pmf(PmfError::ZeroTotalProbability) => 21,
            InferenceError::Pmf(PmfError::EmptyDistribution) => 22,
            InferenceError::Pmf(PmfError::NotFound { .. }) => 23,
            InferenceError::Config(err) => err.code(),
            InferenceError::PatientOutOfRange { .. } => 30,
            InferenceError::CohortTooLarge { .. } => 31,
            InferenceError::EmptyCohort { .. } => 32,
        }
    }

    /// Whether the evidence was impossible under every hypothesis.
    pub fn is_impossible_evidence(&self) -> bool {
        matches!(self, InferenceError::Pmf(PmfError::ZeroTotalProbability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            InferenceError::Pmf(PmfError::ZeroTotalProbability),
            InferenceError::Pmf(PmfError::EmptyDistribution),
            InferenceError::PatientOutOfRange { index: 3, size: 2 },
            InferenceError::CohortTooLarge { size: 30, max: 16 },
            InferenceError::EmptyCohort {
                scenario: "a".to_string(),
            },
            InferenceError::Config(ValidationError::ParseError("bad".to_string())),
        ];
        let mut codes: Vec<u32> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_from_pmf_error() {
        let err: InferenceError = PmfError::ZeroTotalProbability.into();
        assert!(err.is_impossible_evidence());
        assert!(err.to_string().contains("Distribution error"));
    }
}
