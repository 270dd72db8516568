//! Joint status of a cohort tested with one shared test.
//!
//! When every patient is tested with the same draw of the test, results are
//! no longer independent across patients: a positive for one patient is
//! evidence about the shared false-positive rate and therefore about the
//! others. [`CohortTest`] models the joint status of all patients for one
//! fixed rate; a [`MetaSuite`] of them carries the uncertainty over the rate.

use std::fmt;

use mt_math::{MetaSuite, Pmf, Rational, Suite, Weight};

use crate::error::InferenceError;
use crate::medical_test::{check_probability, joint_label, LikelihoodTable, Outcome, Status};

/// Largest cohort a [`CohortTest`] will enumerate (2^n joint hypotheses).
pub const MAX_COHORT_SIZE: usize = 12;

/// One test result attributed to one patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatientResult {
    pub patient: usize,
    pub outcome: Outcome,
}

impl PatientResult {
    pub fn new(patient: usize, outcome: Outcome) -> Self {
        Self { patient, outcome }
    }
}

impl fmt::Display for PatientResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "patient {}: {}", self.patient, self.outcome)
    }
}

/// Pair results with patients in order: the i-th result belongs to patient i.
pub fn assign_patients(outcomes: &[Outcome]) -> Vec<PatientResult> {
    outcomes
        .iter()
        .enumerate()
        .map(|(patient, outcome)| PatientResult::new(patient, *outcome))
        .collect()
}

/// Joint belief over the statuses of `size` patients for one test draw.
#[derive(Debug, Clone)]
pub struct CohortTest<W = Rational> {
    size: usize,
    table: LikelihoodTable<W>,
    pmf: Pmf<Vec<Status>, W>,
}

impl<W: Weight> CohortTest<W> {
    /// Patients are independent a priori, each sick with probability
    /// `prevalence`.
    pub fn new(
        size: usize,
        prevalence: W,
        sensitivity: W,
        false_positive_rate: W,
    ) -> Result<Self, InferenceError> {
        if size > MAX_COHORT_SIZE {
            return Err(InferenceError::CohortTooLarge {
                size,
                max: MAX_COHORT_SIZE,
            });
        }
        check_probability("prevalence", &prevalence)?;
        let table = LikelihoodTable::new(sensitivity, false_positive_rate)?;

        let single = Pmf::from_items([
            (Status::Sick, prevalence.clone()),
            (Status::NotSick, prevalence.complement()),
        ])?;
        let mut pmf = Pmf::from_items([(Vec::new(), W::one())])?;
        for _ in 0..size {
            pmf = pmf.combine(&single, |statuses: &Vec<Status>, status| {
                let mut next = statuses.clone();
                next.push(*status);
                next
            });
        }

        Ok(Self { size, table, pmf })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn false_positive_rate(&self) -> &W {
        self.table.false_positive_rate()
    }

    /// Marginal status distribution of one patient.
    pub fn patient(&self, patient: usize) -> Result<Pmf<Status, W>, InferenceError> {
        self.check_patient(patient)?;
        Ok(self.pmf.map(|statuses| statuses[patient]))
    }

    /// Joint distribution keyed by concatenated labels.
    pub fn labelled(&self) -> Pmf<String, W> {
        self.pmf.map(|statuses| joint_label(statuses))
    }

    fn check_patient(&self, patient: usize) -> Result<(), InferenceError> {
        if patient < self.size {
            Ok(())
        } else {
            Err(InferenceError::PatientOutOfRange {
                index: patient,
                size: self.size,
            })
        }
    }
}

impl<W: Weight> Suite for CohortTest<W> {
    type Hypothesis = Vec<Status>;
    type Data = PatientResult;
    type Weight = W;
    type Error = InferenceError;

    fn pmf(&self) -> &Pmf<Vec<Status>, W> {
        &self.pmf
    }

    fn update(&mut self, result: &PatientResult) -> Result<W, InferenceError> {
        self.check_patient(result.patient)?;
        let table = &self.table;
        self.pmf.update_by(|statuses| {
            Ok::<_, InferenceError>(table.probability(result.outcome, statuses[result.patient]))
        })
    }
}

/// Distribution over shared test draws for a whole cohort.
pub type CohortMetaTest<W = Rational> = MetaSuite<CohortTest<W>>;

/// Build a [`CohortMetaTest`] with one cohort model per `(rate, prior)` pair.
pub fn cohort_meta_test<W, I>(
    size: usize,
    prevalence: W,
    sensitivity: W,
    rates: I,
) -> Result<CohortMetaTest<W>, InferenceError>
where
    W: Weight,
    I: IntoIterator<Item = (W, W)>,
{
    let cohorts = rates
        .into_iter()
        .map(|(rate, prior)| {
            let cohort = CohortTest::new(size, prevalence.clone(), sensitivity.clone(), rate)?;
            Ok((cohort, prior))
        })
        .collect::<Result<Vec<_>, InferenceError>>()?;
    Ok(MetaSuite::new(cohorts)?)
}
