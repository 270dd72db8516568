//! Fuzz target for scenario configuration parsing.
//!
//! Tests that scenario JSON parsing, validation and model building handle
//! arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mt_config::{validate_scenario, ScenarioConfig};
use mt_core::TestModel;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<ScenarioConfig>(data) {
        if validate_scenario(&config).is_ok() {
            let _ = TestModel::from_config(&config);
        }
    }
});
