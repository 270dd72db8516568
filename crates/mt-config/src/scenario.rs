//! Scenario configuration types.
//!
//! A scenario file fixes the test model (prevalence, sensitivity and a prior
//! over the unknown false-positive rate) and optionally the evidence to
//! apply and how it is aggregated.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::exact::Exact;
use crate::validate::ValidationError;

/// Observed test result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[serde(alias = "positive", alias = "+")]
    Pos,
    #[serde(alias = "negative", alias = "-")]
    Neg,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pos => "pos",
            Outcome::Neg => "neg",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Outcome {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pos" | "positive" | "+" => Ok(Outcome::Pos),
            "neg" | "negative" | "-" => Ok(Outcome::Neg),
            other => Err(ValidationError::InvalidValue {
                field: "results".to_string(),
                message: format!("unknown test result '{}'", other),
            }),
        }
    }
}

/// How evidence from several observations is aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Every patient gets an independently drawn test.
    #[serde(alias = "independent")]
    A,
    /// One test draw is shared by the whole cohort.
    #[serde(alias = "shared")]
    B,
    /// One patient retested with the same test draw.
    #[serde(alias = "retest")]
    C,
    /// One patient retested with a fresh test draw each time.
    #[serde(alias = "redraw")]
    D,
}

impl Scenario {
    /// All scenario variants.
    pub const ALL: &'static [Scenario] = &[Scenario::A, Scenario::B, Scenario::C, Scenario::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::A => "a",
            Scenario::B => "b",
            Scenario::C => "c",
            Scenario::D => "d",
        }
    }

    pub fn parse(s: &str) -> Option<Scenario> {
        match s.trim().to_lowercase().as_str() {
            "a" | "independent" => Some(Scenario::A),
            "b" | "shared" => Some(Scenario::B),
            "c" | "retest" => Some(Scenario::C),
            "d" | "redraw" => Some(Scenario::D),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::A => "Each patient is tested with an independently drawn test",
            Scenario::B => "All patients are tested with the same test draw",
            Scenario::C => "One patient is retested with the same test draw",
            Scenario::D => "One patient is retested with a fresh test draw each time",
        }
    }

    /// Whether each result belongs to a different patient.
    pub fn is_cohort(&self) -> bool {
        matches!(self, Scenario::A | Scenario::B)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scenario {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::parse(s).ok_or_else(|| ValidationError::InvalidValue {
            field: "scenario".to_string(),
            message: format!("unknown scenario '{}'", s),
        })
    }
}

/// One hypothesis about the false-positive rate and its prior weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateHypothesis {
    pub rate: Exact,
    /// Unnormalized prior weight.
    #[serde(default = "default_prior")]
    pub prior: Exact,
}

fn default_prior() -> Exact {
    Exact::new(num::BigRational::from_integer(1.into()))
}

/// Complete scenario configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Prior probability that a patient is sick.
    pub prevalence: Exact,

    /// P(pos | sick).
    pub sensitivity: Exact,

    /// Prior over P(pos | notsick).
    pub false_positive_rates: Vec<RateHypothesis>,

    #[serde(default)]
    pub scenario: Option<Scenario>,

    /// Evidence to apply, in order.
    #[serde(default)]
    pub results: Vec<Outcome>,
}

impl ScenarioConfig {
    /// Load a scenario from a `.json` or `.toml` file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Parse a scenario from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Parse a scenario from a TOML string.
    pub fn from_toml_str(text: &str) -> Result<Self, ValidationError> {
        toml::from_str(text)
            .map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// Serialize as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, ValidationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("Cannot serialize: {}", e)))
    }

    /// Replace the evidence, e.g. with results supplied by a caller.
    pub fn with_results(mut self, results: Vec<Outcome>) -> Self {
        self.results = results;
        self
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "schema_version": "1.0.0",
        "prevalence": "1/10",
        "sensitivity": "9/10",
        "false_positive_rates": [
            {"rate": "1/5", "prior": "1/2"},
            {"rate": 0.4}
        ]
    }"#;

    #[test]
    fn test_parse_minimal_scenario() {
        let config = ScenarioConfig::from_json_str(MINIMAL).unwrap();
        assert_eq!(config.prevalence.to_string(), "1/10");
        assert_eq!(config.false_positive_rates.len(), 2);
        assert_eq!(config.false_positive_rates[1].rate.to_string(), "2/5");
        assert_eq!(config.false_positive_rates[1].prior.to_string(), "1");
        assert!(config.scenario.is_none());
        assert!(config.results.is_empty());
    }

    #[test]
    fn test_parse_toml_scenario() {
        let text = r#"
            schema_version = "1.0.0"
            prevalence = "10%"
            sensitivity = 0.9
            scenario = "shared"
            results = ["pos", "negative"]

            [[false_positive_rates]]
            rate = "1/5"

            [[false_positive_rates]]
            rate = "2/5"
            prior = 3
        "#;
        let config = ScenarioConfig::from_toml_str(text).unwrap();
        assert_eq!(config.prevalence.to_string(), "1/10");
        assert_eq!(config.sensitivity.to_string(), "9/10");
        assert_eq!(config.scenario, Some(Scenario::B));
        assert_eq!(config.results, vec![Outcome::Pos, Outcome::Neg]);
        assert_eq!(config.false_positive_rates[1].prior.to_string(), "3");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = ScenarioConfig::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.code(), 61);
    }

    #[test]
    fn test_bad_fraction_is_parse_error() {
        let json = MINIMAL.replace("1/10", "1/0");
        let err = ScenarioConfig::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("zero denominator"));
    }

    #[test]
    fn test_json_round_trip() {
        let config = ScenarioConfig::from_json_str(MINIMAL)
            .unwrap()
            .with_scenario(Scenario::C)
            .with_results(vec![Outcome::Pos, Outcome::Pos]);
        let json = config.to_json_pretty().unwrap();
        let back = ScenarioConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_scenario_parse_and_display() {
        for scenario in Scenario::ALL {
            assert_eq!(Scenario::parse(scenario.as_str()), Some(*scenario));
        }
        assert_eq!("retest".parse::<Scenario>().unwrap(), Scenario::C);
        assert!("z".parse::<Scenario>().is_err());
        assert!(Scenario::A.is_cohort());
        assert!(!Scenario::D.is_cohort());
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!("POS".parse::<Outcome>().unwrap(), Outcome::Pos);
        assert_eq!("-".parse::<Outcome>().unwrap(), Outcome::Neg);
        assert!("maybe".parse::<Outcome>().is_err());
        assert_eq!(Outcome::Neg.to_string(), "neg");
    }
}
