//! Test model shared by all scenarios: prevalence, sensitivity and the prior
//! over the false-positive rate.

use mt_config::{validate_scenario, ScenarioConfig};
use mt_math::{Pmf, Rational};

use crate::cohort::{cohort_meta_test, CohortMetaTest};
use crate::error::Result;
use crate::medical_test::Test;
use crate::meta_test::{meta_test, MetaTest};

/// Exact parameters of a diagnostic test with an uncertain false-positive
/// rate.
#[derive(Debug, Clone, PartialEq)]
pub struct TestModel {
    prevalence: Rational,
    sensitivity: Rational,
    rates: Pmf<Rational>,
}

impl TestModel {
    /// Build a model from `(rate, prior_weight)` pairs; priors are normalized.
    pub fn new<I>(prevalence: Rational, sensitivity: Rational, rates: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Rational, Rational)>,
    {
        let mut rates = Pmf::from_items(rates)?;
        rates.normalize()?;
        // Surface range errors before any scenario runs.
        meta_test(prevalence.clone(), sensitivity.clone(), rates.items().map(clone_pair))?;
        Ok(Self {
            prevalence,
            sensitivity,
            rates,
        })
    }

    /// Validate `config` and extract its model.
    pub fn from_config(config: &ScenarioConfig) -> Result<Self> {
        validate_scenario(config)?;
        Self::new(
            config.prevalence.value().clone(),
            config.sensitivity.value().clone(),
            config
                .false_positive_rates
                .iter()
                .map(|h| (h.rate.value().clone(), h.prior.value().clone())),
        )
    }

    pub fn prevalence(&self) -> &Rational {
        &self.prevalence
    }

    pub fn sensitivity(&self) -> &Rational {
        &self.sensitivity
    }

    /// Normalized prior over the false-positive rate.
    pub fn rate_prior(&self) -> &Pmf<Rational> {
        &self.rates
    }

    /// Prior mean of the false-positive rate.
    pub fn expected_rate(&self) -> Result<Rational> {
        Ok(self.rates.expectation(|rate| rate.clone())?)
    }

    /// Fresh meta-test with one sub-test per candidate rate.
    pub fn meta_test(&self) -> Result<MetaTest> {
        Ok(meta_test(
            self.prevalence.clone(),
            self.sensitivity.clone(),
            self.rates.items().map(clone_pair),
        )?)
    }

    /// Test with the rate fixed to `rate`.
    pub fn test_with_rate(&self, rate: Rational) -> Result<Test> {
        Ok(Test::new(
            self.prevalence.clone(),
            self.sensitivity.clone(),
            rate,
        )?)
    }

    /// Test whose rate is the prior mean, i.e. the rate marginalized out for
    /// a single fresh draw.
    pub fn averaged_test(&self) -> Result<Test> {
        self.test_with_rate(self.expected_rate()?)
    }

    /// Cohort of `size` patients sharing one draw of the rate.
    pub fn cohort_meta_test(&self, size: usize) -> Result<CohortMetaTest> {
        cohort_meta_test(
            size,
            self.prevalence.clone(),
            self.sensitivity.clone(),
            self.rates.items().map(clone_pair),
        )
    }
}

fn clone_pair((rate, weight): (&Rational, &Rational)) -> (Rational, Rational) {
    (rate.clone(), weight.clone())
}
