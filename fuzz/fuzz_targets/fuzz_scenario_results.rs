//! Fuzz target for scenario runs over arbitrary result sequences.
//!
//! Every scenario must either fail with an error or return normalized
//! distributions.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mt_core::{run_scenario, Outcome, Scenario, TestModel};
use mt_math::{ratio, Pmf};
use std::fmt::Debug;
use std::hash::Hash;

#[derive(Debug, Arbitrary)]
struct Input {
    scenario: u8,
    prevalence: u8,
    sensitivity: u8,
    rates: Vec<(u8, u8)>,
    results: Vec<bool>,
}

fn is_normalized<H>(pmf: &Pmf<H>) -> bool
where
    H: Clone + Eq + Hash + Debug,
{
    pmf.total() == ratio(1, 1)
}

fuzz_target!(|input: Input| {
    let rates = input
        .rates
        .iter()
        .take(8)
        .map(|&(rate, prior)| (ratio(i64::from(rate), 255), ratio(i64::from(prior), 255)));
    let Ok(model) = TestModel::new(
        ratio(i64::from(input.prevalence), 255),
        ratio(i64::from(input.sensitivity), 255),
        rates,
    ) else {
        return;
    };

    let scenario = Scenario::ALL[usize::from(input.scenario) % Scenario::ALL.len()];
    let results: Vec<Outcome> = input
        .results
        .iter()
        .take(8)
        .map(|&pos| if pos { Outcome::Pos } else { Outcome::Neg })
        .collect();

    if let Ok(report) = run_scenario(&model, scenario, &results) {
        assert!(is_normalized(&report.joint));
        assert!(report.marginals.iter().all(is_normalized));
    }
});
