//! Sequential Bayesian updating over a hypothesis space.
//!
//! A suite owns a [`Pmf`] of beliefs and knows how to absorb one datum at a
//! time. The pure part of that contract (how likely is `data` under one
//! hypothesis) lives in [`Likelihood`]; [`Suite::update`] is the stateful
//! part and reports the normalizing constant so higher levels of a hierarchy
//! can use it as evidence.

use std::fmt;
use std::hash::Hash;

use super::pmf::{Pmf, PmfError};
use super::weight::Weight;

/// Pure likelihood lookup: `P(data | hypothesis)`, possibly unnormalized.
///
/// Implementations must not depend on the current beliefs and must not have
/// side effects. Values are expected in `[0, 1]` when they model a true
/// probability; only non-negativity is checked.
pub trait Likelihood {
    type Hypothesis;
    type Data: ?Sized;
    type Weight: Weight;

    fn likelihood(&self, data: &Self::Data, hypothesis: &Self::Hypothesis) -> Self::Weight;
}

/// A distribution that can be updated with evidence.
pub trait Suite {
    type Hypothesis: Clone + Eq + Hash + fmt::Debug;
    type Data: ?Sized;
    type Weight: Weight;
    type Error: From<PmfError>;

    /// Current beliefs.
    fn pmf(&self) -> &Pmf<Self::Hypothesis, Self::Weight>;

    /// Absorb one datum and return `P(data)` under the beliefs held before
    /// the update.
    fn update(&mut self, data: &Self::Data) -> Result<Self::Weight, Self::Error>;

    /// Absorb every datum in order and return the normalizing constant of the
    /// last one.
    ///
    /// Later items are conditioned on beliefs already updated by earlier
    /// items. An empty dataset leaves the beliefs untouched and returns one.
    fn update_set<'a, I>(&mut self, dataset: I) -> Result<Self::Weight, Self::Error>
    where
        I: IntoIterator<Item = &'a Self::Data>,
        Self::Data: 'a,
    {
        let mut last = <Self::Weight as num::One>::one();
        for data in dataset {
            last = self.update(data)?;
        }
        Ok(last)
    }

    /// Probability currently assigned to `hypothesis`.
    fn probability(&self, hypothesis: &Self::Hypothesis) -> Self::Weight {
        self.pmf().probability(hypothesis)
    }
}

/// Bayes step shared by every leaf suite: reweight `pmf` with a pure
/// likelihood model and normalize.
pub fn bayes_update<L, H>(
    pmf: &mut Pmf<H, L::Weight>,
    model: &L,
    data: &L::Data,
) -> Result<L::Weight, PmfError>
where
    L: Likelihood<Hypothesis = H>,
    H: Clone + Eq + Hash + fmt::Debug,
{
    pmf.update_by(|hypothesis| Ok::<_, PmfError>(model.likelihood(data, hypothesis)))
}
