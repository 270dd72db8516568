//! Configuration resolution and path discovery.
//!
//! Resolution order: explicit path → environment variables → XDG path → built-in preset.

use std::path::{Path, PathBuf};

use crate::preset::{get_preset, PresetName};
use crate::scenario::ScenarioConfig;
use crate::validate::{validate_scenario, ValidationResult};

/// Where a scenario configuration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided by the caller.
    Explicit,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using a built-in preset.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Explicit => write!(f, "explicit path"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Discovered scenario file path.
#[derive(Debug, Clone, Default)]
pub struct ConfigPath {
    /// Path to the scenario file (or None if not found).
    pub path: Option<PathBuf>,

    /// Source of the path (for diagnostics).
    pub source: ConfigSource,
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "MEDTEST_CONFIG";
pub const ENV_CONFIG_DIR: &str = "MEDTEST_CONFIG_DIR";

/// Scenario file names searched in config directories, in order.
const SCENARIO_FILENAMES: &[&str] = &["scenario.json", "scenario.toml"];

/// Application name for XDG directories.
const APP_NAME: &str = "medtest";

/// Resolve the scenario path using the standard resolution order.
///
/// 1. Explicit path (if provided and present)
/// 2. `MEDTEST_CONFIG` environment variable
/// 3. `MEDTEST_CONFIG_DIR` environment variable + scenario file name
/// 4. XDG config directory (`~/.config/medtest/`)
/// 5. Built-in default (None)
pub fn resolve_config(explicit: Option<&Path>) -> ConfigPath {
    // 1. Explicit path
    if let Some(path) = explicit {
        if path.exists() {
            return found(path.to_path_buf(), ConfigSource::Explicit);
        }
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        if let Some(path) = find_in_dir(Path::new(&config_dir)) {
            return found(path, ConfigSource::Environment);
        }
    }

    // 4. XDG config directory
    if let Some(dir) = xdg_config_dir() {
        if let Some(path) = find_in_dir(&dir) {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    ConfigPath::default()
}

fn found(path: PathBuf, source: ConfigSource) -> ConfigPath {
    ConfigPath {
        path: Some(path),
        source,
    }
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    SCENARIO_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Get the XDG config directory for medtest.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// A loaded, validated scenario and where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedScenario {
    pub config: ScenarioConfig,
    pub source: ConfigSource,
    pub path: Option<PathBuf>,
}

/// Resolve, load and validate a scenario, falling back to `fallback` when
/// no file is found.
pub fn load_scenario(
    explicit: Option<&Path>,
    fallback: PresetName,
) -> ValidationResult<ResolvedScenario> {
    let resolved = resolve_config(explicit);
    let config = match &resolved.path {
        Some(path) => ScenarioConfig::from_file(path)?,
        None => get_preset(fallback),
    };
    validate_scenario(&config)?;

    Ok(ResolvedScenario {
        config,
        source: resolved.source,
        path: resolved.path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::Explicit), "explicit path");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(format!("{}", ConfigSource::XdgConfig), "XDG config");
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn test_find_in_dir_prefers_json() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("scenario.toml"), "").unwrap();
        assert_eq!(
            find_in_dir(dir.path()),
            Some(dir.path().join("scenario.toml"))
        );
        std::fs::write(dir.path().join("scenario.json"), "{}").unwrap();
        assert_eq!(
            find_in_dir(dir.path()),
            Some(dir.path().join("scenario.json"))
        );
    }

    #[test]
    fn test_missing_dir_finds_nothing() {
        assert_eq!(find_in_dir(Path::new("/nonexistent/medtest")), None);
    }
}
