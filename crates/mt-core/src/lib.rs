//! Medical test inference.
//!
//! This library provides:
//! - Single-patient tests and meta-tests over an uncertain false-positive rate
//! - Cohort models for results that share one test draw
//! - Scenario runners (independent, shared, retest, fresh retest)
//! - Configuration loading, forward simulation and structured logging

pub mod cohort;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod scenario;
pub mod simulate;

pub use cohort::{CohortMetaTest, CohortTest, PatientResult, MAX_COHORT_SIZE};
pub use error::{InferenceError, Result};
pub use medical_test::{joint_label, LikelihoodTable, Outcome, Status, Test};
pub use meta_test::{meta_test, rate_posterior, test_for_rate, MetaTest};
pub use model::TestModel;
pub use scenario::{run_config, run_scenario, ScenarioReport};
pub use simulate::{Simulation, Simulator};

pub use mt_config::Scenario;
