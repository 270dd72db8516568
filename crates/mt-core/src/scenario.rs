//! Scenario runner.
//!
//! The four scenarios share one [`TestModel`] and differ only in how the
//! results relate to patients and to draws of the test:
//!
//! | scenario | patients | test draw |
//! |----------|----------|-----------|
//! | A | one per result | independent per patient |
//! | B | one per result | shared by the cohort |
//! | C | one | shared by every retest |
//! | D | one | fresh for every retest |

use std::fmt;

use mt_config::{Scenario, ScenarioConfig};
use mt_math::{concat, Pmf, Rational, Suite};
use num::One;
use serde_json::{json, Value};

use crate::cohort::{assign_patients, MAX_COHORT_SIZE};
use crate::error::{InferenceError, Result};
use crate::logging::{event_names, Stage};
use crate::medical_test::{joint_label, Outcome, Status};
use crate::meta_test::rate_posterior;
use crate::model::TestModel;

/// Outcome of running one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub results: Vec<Outcome>,
    /// Joint status of every patient, keyed by concatenated labels.
    pub joint: Pmf<String>,
    /// Status distribution of each patient.
    pub marginals: Vec<Pmf<Status>>,
    /// Posterior over the false-positive rate, one per independent draw.
    /// Empty when the rate is marginalized out (scenario D).
    pub rate_posteriors: Vec<Pmf<Rational>>,
    /// Normalizing constant of the last update (one if nothing was applied).
    pub last_constant: Rational,
}

impl ScenarioReport {
    /// Probability that patient `patient` is sick.
    pub fn p_sick(&self, patient: usize) -> Option<Rational> {
        self.marginals
            .get(patient)
            .map(|pmf| pmf.probability(&Status::Sick))
    }

    pub fn patients(&self) -> usize {
        self.marginals.len()
    }

    /// Machine-readable form with weights as fraction strings.
    pub fn to_json(&self) -> Value {
        json!({
            "scenario": self.scenario.as_str(),
            "description": self.scenario.description(),
            "results": self.results.iter().map(Outcome::as_str).collect::<Vec<_>>(),
            "joint": pmf_json(&self.joint),
            "marginals": self.marginals.iter().map(pmf_json).collect::<Vec<_>>(),
            "rate_posteriors": self.rate_posteriors.iter().map(pmf_json).collect::<Vec<_>>(),
            "last_constant": self.last_constant.to_string(),
        })
    }
}

fn pmf_json<H: fmt::Display>(pmf: &Pmf<H>) -> Value {
    Value::Array(
        pmf.items()
            .map(|(h, w)| json!({ "hypothesis": h.to_string(), "weight": w.to_string() }))
            .collect(),
    )
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scenario {}: {}", self.scenario, self.scenario.description())?;
        let results: Vec<&str> = self.results.iter().map(Outcome::as_str).collect();
        writeln!(f, "results: [{}]", results.join(", "))?;
        writeln!(f, "joint:")?;
        write!(f, "{}", self.joint.render_sorted())?;
        for (patient, marginal) in self.marginals.iter().enumerate() {
            writeln!(f, "patient {}:", patient)?;
            write!(f, "{}", marginal.render_sorted())?;
        }
        for (draw, rates) in self.rate_posteriors.iter().enumerate() {
            writeln!(f, "rate posterior {}:", draw)?;
            write!(f, "{}", rates.render_sorted())?;
        }
        writeln!(f, "last constant: {}", self.last_constant)
    }
}

/// Run `scenario` on `results` under `model`.
pub fn run_scenario(
    model: &TestModel,
    scenario: Scenario,
    results: &[Outcome],
) -> Result<ScenarioReport> {
    crate::log_event!(
        INFO,
        event_names::SCENARIO_STARTED,
        Stage::Update,
        "running scenario",
        scenario = %scenario,
        results = results.len()
    );

    let outcome = match scenario {
        Scenario::A => independent_draws(model, results),
        Scenario::B => shared_draw(model, results),
        Scenario::C => retest_same_draw(model, results),
        Scenario::D => retest_fresh_draws(model, results),
    };

    match &outcome {
        Ok(report) => crate::log_event!(
            INFO,
            event_names::SCENARIO_FINISHED,
            Stage::Report,
            "scenario finished",
            scenario = %scenario,
            patients = report.patients(),
            last_constant = %report.last_constant
        ),
        Err(err) => crate::log_event!(
            WARN,
            event_names::UPDATE_FAILED,
            Stage::Update,
            "scenario failed",
            scenario = %scenario,
            code = err.code(),
            error = %err
        ),
    }
    outcome
}

/// Build the model from `config` and run its scenario (C when unset) on its
/// results.
pub fn run_config(config: &ScenarioConfig) -> Result<ScenarioReport> {
    let model = TestModel::from_config(config)?;
    crate::log_event!(
        DEBUG,
        event_names::MODEL_BUILT,
        Stage::Build,
        "built test model",
        prevalence = %model.prevalence(),
        sensitivity = %model.sensitivity(),
        rates = model.rate_prior().len()
    );
    run_scenario(&model, config.scenario.unwrap_or(Scenario::C), &config.results)
}

fn require_patients(scenario: Scenario, results: &[Outcome]) -> Result<()> {
    if results.is_empty() {
        return Err(InferenceError::EmptyCohort {
            scenario: scenario.to_string(),
        });
    }
    Ok(())
}

/// A: every patient has their own meta-test; the joint is the convolution of
/// the per-patient mixtures.
fn independent_draws(model: &TestModel, results: &[Outcome]) -> Result<ScenarioReport> {
    require_patients(Scenario::A, results)?;

    let mut marginals = Vec::with_capacity(results.len());
    let mut rate_posteriors = Vec::with_capacity(results.len());
    let mut last_constant = Rational::one();
    for (patient, outcome) in results.iter().enumerate() {
        let mut meta = model.meta_test()?;
        last_constant = meta.update(outcome)?;
        crate::log_event!(
            DEBUG,
            event_names::UPDATE_APPLIED,
            Stage::Update,
            "applied result",
            patient = patient,
            outcome = %outcome,
            constant = %last_constant
        );
        marginals.push(meta.mixture()?);
        rate_posteriors.push(rate_posterior(&meta));
    }

    let mut joint = Pmf::from_items([(String::new(), Rational::one())])?;
    for marginal in &marginals {
        joint = joint.combine(marginal, concat);
    }
    crate::log_event!(
        DEBUG,
        event_names::COMBINE_FINISHED,
        Stage::Combine,
        "combined patients",
        outcomes = joint.len()
    );

    Ok(ScenarioReport {
        scenario: Scenario::A,
        results: results.to_vec(),
        joint,
        marginals,
        rate_posteriors,
        last_constant,
    })
}

/// B: one draw of the rate is shared, so every result reweights it for
/// all patients.
fn shared_draw(model: &TestModel, results: &[Outcome]) -> Result<ScenarioReport> {
    require_patients(Scenario::B, results)?;
    if results.len() > MAX_COHORT_SIZE {
        return Err(InferenceError::CohortTooLarge {
            size: results.len(),
            max: MAX_COHORT_SIZE,
        });
    }

    let mut meta = model.cohort_meta_test(results.len())?;
    let mut last_constant = Rational::one();
    for result in assign_patients(results) {
        last_constant = meta.update(&result)?;
        crate::log_event!(
            DEBUG,
            event_names::UPDATE_APPLIED,
            Stage::Update,
            "applied result",
            patient = result.patient,
            outcome = %result.outcome,
            constant = %last_constant
        );
    }

    let mixture = meta.mixture()?;
    let marginals = (0..results.len())
        .map(|patient| mixture.map(|statuses| statuses[patient]))
        .collect();
    let rates = meta.marginal(|cohort| cohort.false_positive_rate().clone());

    Ok(ScenarioReport {
        scenario: Scenario::B,
        results: results.to_vec(),
        joint: mixture.map(|statuses| joint_label(statuses)),
        marginals,
        rate_posteriors: vec![rates],
        last_constant,
    })
}

/// C: one patient, every retest uses the same draw of the rate.
fn retest_same_draw(model: &TestModel, results: &[Outcome]) -> Result<ScenarioReport> {
    let mut meta = model.meta_test()?;
    let last_constant = meta.update_set(results)?;
    let mixture = meta.mixture()?;

    Ok(ScenarioReport {
        scenario: Scenario::C,
        results: results.to_vec(),
        joint: mixture.map(|status| status.to_string()),
        marginals: vec![mixture],
        rate_posteriors: vec![rate_posterior(&meta)],
        last_constant,
    })
}

/// D: one patient, every retest draws the rate afresh, so the rate is
/// averaged out of each result's likelihood.
fn retest_fresh_draws(model: &TestModel, results: &[Outcome]) -> Result<ScenarioReport> {
    let mut test = model.averaged_test()?;
    let last_constant = test.update_set(results)?;
    let marginal = test.pmf().clone();

    Ok(ScenarioReport {
        scenario: Scenario::D,
        results: results.to_vec(),
        joint: marginal.map(|status| status.to_string()),
        marginals: vec![marginal],
        rate_posteriors: Vec::new(),
        last_constant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mt_config::{get_preset, PresetName};
    use mt_math::ratio;

    fn textbook() -> TestModel {
        TestModel::from_config(&get_preset(PresetName::Textbook)).unwrap()
    }

    const POS_POS: &[Outcome] = &[Outcome::Pos, Outcome::Pos];

    #[test]
    fn test_single_result_agrees_across_scenarios() {
        let model = textbook();
        for scenario in Scenario::ALL {
            let report = run_scenario(&model, *scenario, &[Outcome::Pos]).unwrap();
            assert_eq!(report.p_sick(0), Some(ratio(1, 4)), "scenario {}", scenario);
            assert_eq!(report.last_constant, ratio(9, 25));
        }
    }

    #[test]
    fn test_cohort_scenarios_need_results() {
        let model = textbook();
        for scenario in [Scenario::A, Scenario::B] {
            let err = run_scenario(&model, scenario, &[]).unwrap_err();
            assert_eq!(err.code(), 32);
        }
    }

    #[test]
    fn test_retest_without_results_is_prior() {
        let model = textbook();
        let report = run_scenario(&model, Scenario::C, &[]).unwrap();
        assert_eq!(report.p_sick(0), Some(ratio(1, 10)));
        assert_eq!(report.last_constant, ratio(1, 1));
    }

    #[test]
    fn test_shared_draw_cohort_limit() {
        let model = textbook();
        let results = vec![Outcome::Neg; MAX_COHORT_SIZE + 1];
        let err = run_scenario(&model, Scenario::B, &results).unwrap_err();
        assert!(matches!(err, InferenceError::CohortTooLarge { .. }));
    }

    #[test]
    fn test_report_display_and_json() {
        let report = run_scenario(&textbook(), Scenario::A, POS_POS).unwrap();
        let text = report.to_string();
        assert!(text.contains("sicksick 1/16"));
        assert!(text.contains("last constant: 9/25"));

        let json = report.to_json();
        assert_eq!(json["scenario"], "a");
        assert_eq!(json["marginals"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["joint"][0]["hypothesis"], "sicksick");
        assert_eq!(json["joint"][0]["weight"], "1/16");
    }

    #[test]
    fn test_run_config_defaults_to_retest() {
        let config = get_preset(PresetName::Textbook).with_results(POS_POS.to_vec());
        let report = run_config(&config).unwrap();
        assert_eq!(report.scenario, Scenario::C);
        assert_eq!(report.p_sick(0), Some(ratio(9, 19)));
    }
}
