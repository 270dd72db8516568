//! Built-in scenario presets.
//!
//! Provides ready-made test models for:
//! - Textbook: two candidate false-positive rates with equal prior weight
//! - SingleRate: the false-positive rate is known exactly
//! - Wide: three candidate rates spread over a broad range

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::exact::Exact;
use crate::scenario::{RateHypothesis, ScenarioConfig};
use crate::CONFIG_SCHEMA_VERSION;

/// Available scenario presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetName {
    /// p = 1/10, s = 9/10, t in {1/5, 2/5} at 1/2 each
    #[default]
    Textbook,
    /// p = 1/10, s = 9/10, t = 3/10
    SingleRate,
    /// p = 1/10, s = 9/10, t in {1/10, 3/10, 1/2} uniform
    Wide,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] = &[
        PresetName::Textbook,
        PresetName::SingleRate,
        PresetName::Wide,
    ];

    /// Get preset name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::Textbook => "textbook",
            PresetName::SingleRate => "single-rate",
            PresetName::Wide => "wide",
        }
    }

    /// Parse preset name from string.
    pub fn parse(s: &str) -> Option<PresetName> {
        match s.to_lowercase().as_str() {
            "textbook" | "default" => Some(PresetName::Textbook),
            "single-rate" | "single_rate" | "single" | "known" => Some(PresetName::SingleRate),
            "wide" | "uniform" => Some(PresetName::Wide),
            _ => None,
        }
    }

    /// Get a description of the preset.
    pub fn description(&self) -> &'static str {
        match self {
            PresetName::Textbook => "Two equally likely false-positive rates, 1/5 and 2/5",
            PresetName::SingleRate => "False-positive rate known to be 3/10",
            PresetName::Wide => "Uniform prior over false-positive rates 1/10, 3/10 and 1/2",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| PresetError::UnknownPreset(s.to_string()))
    }
}

/// Errors related to preset operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    /// Unknown preset name.
    UnknownPreset(String),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::UnknownPreset(name) => {
                write!(
                    f,
                    "Unknown preset '{}'. Available: {}",
                    name,
                    PresetName::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
        }
    }
}

impl std::error::Error for PresetError {}

/// Get the scenario configuration for a preset.
pub fn get_preset(name: PresetName) -> ScenarioConfig {
    match name {
        PresetName::Textbook => model(name, &[((1, 5), (1, 2)), ((2, 5), (1, 2))]),
        PresetName::SingleRate => model(name, &[((3, 10), (1, 1))]),
        PresetName::Wide => model(
            name,
            &[((1, 10), (1, 3)), ((3, 10), (1, 3)), ((1, 2), (1, 3))],
        ),
    }
}

/// List all presets with their descriptions.
pub fn list_presets() -> Vec<(PresetName, &'static str)> {
    PresetName::ALL
        .iter()
        .map(|p| (*p, p.description()))
        .collect()
}

/// Rates and priors as `(numerator, denominator)` pairs.
fn model(name: PresetName, rates: &[((i64, i64), (i64, i64))]) -> ScenarioConfig {
    ScenarioConfig {
        schema_version: CONFIG_SCHEMA_VERSION.to_string(),
        description: Some(format!("{} preset: {}", name, name.description())),
        prevalence: fraction(1, 10),
        sensitivity: fraction(9, 10),
        false_positive_rates: rates
            .iter()
            .map(|&((rn, rd), (pn, pd))| RateHypothesis {
                rate: fraction(rn, rd),
                prior: fraction(pn, pd),
            })
            .collect(),
        scenario: None,
        results: Vec::new(),
    }
}

fn fraction(numer: i64, denom: i64) -> Exact {
    Exact::new(num::BigRational::new(numer.into(), denom.into()))
}
