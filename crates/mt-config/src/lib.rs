//! Medical test scenario configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for scenario files (JSON or TOML)
//! - Exact rational parsing of probabilities
//! - Config resolution (explicit → env → XDG → preset)
//! - Semantic validation and built-in presets

pub mod exact;
pub mod preset;
pub mod resolve;
pub mod scenario;
pub mod validate;

pub use exact::{parse_exact, Exact};
pub use preset::{get_preset, PresetName};
pub use resolve::{load_scenario, resolve_config, ConfigSource, ResolvedScenario};
pub use scenario::{Outcome, RateHypothesis, Scenario, ScenarioConfig};
pub use validate::{validate_scenario, ValidationError, ValidationResult};

/// Schema version for scenario files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
