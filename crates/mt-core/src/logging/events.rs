//! Structured event vocabulary for logging.
//!
//! Every event carries a `stage` field and is emitted with one of the
//! stable names in [`event_names`] as its `event` field, so JSONL consumers
//! can filter without parsing messages.

use serde::{Deserialize, Serialize};

/// Processing stages of a scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Scenario configuration loading and validation.
    Config,
    /// Building tests and meta-tests from the model.
    Build,
    /// Applying test results.
    Update,
    /// Combining per-patient distributions.
    Combine,
    /// Assembling the scenario report.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Config => "config",
            Stage::Build => "build",
            Stage::Update => "update",
            Stage::Combine => "combine",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Config stage
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    // Scenario lifecycle
    pub const SCENARIO_STARTED: &str = "scenario.started";
    pub const SCENARIO_FINISHED: &str = "scenario.finished";

    // Build stage
    pub const MODEL_BUILT: &str = "model.built";

    // Update stage
    pub const UPDATE_APPLIED: &str = "update.applied";
    pub const UPDATE_FAILED: &str = "update.failed";

    // Combine stage
    pub const COMBINE_FINISHED: &str = "combine.finished";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_serialization() {
        assert_eq!(serde_json::to_string(&Stage::Update).unwrap(), "\"update\"");
        assert_eq!(serde_json::to_string(&Stage::Combine).unwrap(), "\"combine\"");
    }

    #[test]
    fn test_stage_display_matches_serde() {
        for stage in [
            Stage::Config,
            Stage::Build,
            Stage::Update,
            Stage::Combine,
            Stage::Report,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage));
        }
    }

    #[test]
    fn test_event_names_are_namespaced_by_stage() {
        assert!(event_names::UPDATE_APPLIED.starts_with("update."));
        assert!(event_names::CONFIG_LOADED.starts_with("config."));
    }
}
