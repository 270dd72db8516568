//! Configuration loading for mt-core.
//!
//! Wraps mt-config resolution and reports where the scenario came from.

pub use mt_config::preset::{get_preset, list_presets, PresetError, PresetName};
pub use mt_config::resolve::{ConfigSource, ResolvedScenario};
pub use mt_config::{Outcome, Scenario, ScenarioConfig, ValidationError, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use crate::error::Result;
use crate::logging::{event_names, Stage};

/// Resolve, load and validate a scenario.
///
/// Falls back to the `fallback` preset when no file is found through the
/// explicit path, `MEDTEST_CONFIG`, `MEDTEST_CONFIG_DIR` or the XDG config
/// directory.
pub fn load_config(explicit: Option<&Path>, fallback: PresetName) -> Result<ResolvedScenario> {
    match mt_config::load_scenario(explicit, fallback) {
        Ok(resolved) => {
            match &resolved.path {
                Some(path) => crate::log_event!(
                    INFO,
                    event_names::CONFIG_LOADED,
                    Stage::Config,
                    "loaded scenario",
                    path = %path.display(),
                    source = %resolved.source
                ),
                None => crate::log_event!(
                    INFO,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Config,
                    "using built-in preset",
                    preset = %fallback
                ),
            }
            Ok(resolved)
        }
        Err(err) => {
            crate::log_event!(
                ERROR,
                event_names::CONFIG_ERROR,
                Stage::Config,
                "scenario configuration rejected",
                code = err.code(),
                error = %err
            );
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_file_is_loaded() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scenario.json");
        let config = get_preset(PresetName::Wide).with_scenario(Scenario::D);
        std::fs::write(&path, config.to_json_pretty().unwrap()).unwrap();

        let resolved = load_config(Some(&path), PresetName::Textbook).unwrap();
        assert_eq!(resolved.source, ConfigSource::Explicit);
        assert_eq!(resolved.config.scenario, Some(Scenario::D));
    }

    #[test]
    fn test_broken_file_maps_to_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scenario.json");
        std::fs::write(&path, "{").unwrap();

        let err = load_config(Some(&path), PresetName::Textbook).unwrap_err();
        assert_eq!(err.code(), 61);
    }
}
