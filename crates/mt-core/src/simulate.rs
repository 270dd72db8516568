//! Forward simulation of the generative process behind each scenario.
//!
//! Draws rates from their prior, statuses from the prevalence and results
//! from the test, so exact posteriors can be checked against rejection
//! sampling.

use mt_config::Scenario;
use mt_math::{Pmf, Rational, Weight};
use rand::Rng;

use crate::error::Result;
use crate::medical_test::{Outcome, Status};
use crate::model::TestModel;

/// One simulated run.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    /// Status per patient (one entry for the retest scenarios).
    pub statuses: Vec<Status>,
    /// Rate used for each result.
    pub rates: Vec<Rational>,
    pub results: Vec<Outcome>,
}

/// Samples runs of one model.
#[derive(Debug, Clone)]
pub struct Simulator<'a> {
    model: &'a TestModel,
    status_prior: Pmf<Status>,
}

impl<'a> Simulator<'a> {
    pub fn new(model: &'a TestModel) -> Result<Self> {
        let status_prior = Pmf::from_items([
            (Status::Sick, model.prevalence().clone()),
            (Status::NotSick, model.prevalence().complement()),
        ])?;
        Ok(Self {
            model,
            status_prior,
        })
    }

    /// Simulate `count` results under `scenario`.
    pub fn draw<R>(&self, scenario: Scenario, count: usize, rng: &mut R) -> Result<Simulation>
    where
        R: Rng + ?Sized,
    {
        let patients = if scenario.is_cohort() { count } else { 1 };
        let statuses = (0..patients)
            .map(|_| self.status_prior.sample(rng).copied())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let rates = match scenario {
            Scenario::B | Scenario::C => {
                let shared = self.draw_rate(rng)?;
                vec![shared; count]
            }
            Scenario::A | Scenario::D => (0..count)
                .map(|_| self.draw_rate(rng))
                .collect::<Result<Vec<_>>>()?,
        };

        let results = rates
            .iter()
            .enumerate()
            .map(|(i, rate)| {
                let status = statuses[if scenario.is_cohort() { i } else { 0 }];
                self.draw_outcome(status, rate, rng)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Simulation {
            statuses,
            rates,
            results,
        })
    }

    fn draw_rate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Rational> {
        Ok(self.model.rate_prior().sample(rng)?.clone())
    }

    fn draw_outcome<R: Rng + ?Sized>(
        &self,
        status: Status,
        rate: &Rational,
        rng: &mut R,
    ) -> Result<Outcome> {
        let positive = match status {
            Status::Sick => self.model.sensitivity().clone(),
            Status::NotSick => rate.clone(),
        };
        let outcomes = Pmf::from_items([
            (Outcome::Pos, positive.clone()),
            (Outcome::Neg, positive.complement()),
        ])?;
        Ok(*outcomes.sample(rng)?)
    }
}
