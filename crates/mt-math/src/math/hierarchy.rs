//! Two-level (hierarchical) inference.
//!
//! A [`MetaSuite`] puts a distribution over whole suites: its hypotheses are
//! handles into an arena of sub-suites it owns exclusively. Updating the
//! meta level updates every sub-suite with the same datum and reweights each
//! one by the normalizing constant it reported, i.e. by how well that
//! sub-model predicted the datum.

use std::fmt;
use std::hash::Hash;

use super::mixture::{make_mixture, MetaPmf};
use super::pmf::{Pmf, PmfError};
use super::suite::Suite;

/// Handle to a sub-suite owned by a [`MetaSuite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiteId(usize);

impl SuiteId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SuiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Score a sub-suite against one datum.
///
/// This is not a pure query: evaluating the likelihood of a sub-model
/// consumes one unit of evidence from that sub-model's own posterior. The
/// returned normalizing constant is the sub-model's marginal likelihood of
/// `data`.
pub fn consume_and_score<S: Suite>(suite: &mut S, data: &S::Data) -> Result<S::Weight, S::Error> {
    suite.update(data)
}

/// Distribution over sub-suites, each owned exclusively by this container.
#[derive(Debug, Clone)]
pub struct MetaSuite<S: Suite> {
    suites: Vec<S>,
    pmf: Pmf<SuiteId, S::Weight>,
}

impl<S: Suite> MetaSuite<S> {
    /// Take ownership of `(suite, prior_weight)` pairs and normalize the
    /// priors.
    pub fn new<I>(entries: I) -> Result<Self, PmfError>
    where
        I: IntoIterator<Item = (S, S::Weight)>,
    {
        let mut suites = Vec::new();
        let mut pmf = Pmf::new();
        for (suite, prior) in entries {
            let id = SuiteId(suites.len());
            pmf.set(id, prior)?;
            suites.push(suite);
        }
        pmf.normalize()?;
        Ok(Self { suites, pmf })
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    pub fn suite(&self, id: SuiteId) -> Option<&S> {
        self.suites.get(id.0)
    }

    /// Top-level weight of `id`.
    pub fn weight(&self, id: SuiteId) -> S::Weight {
        self.pmf.probability(&id)
    }

    /// `(id, suite, weight)` triples in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (SuiteId, &S, &S::Weight)> + '_ {
        self.pmf
            .items()
            .map(move |(id, weight)| (*id, &self.suites[id.0], weight))
    }

    /// Marginal over the bottom-level hypotheses, averaging over which
    /// sub-suite applies.
    pub fn mixture(&self) -> Result<Pmf<S::Hypothesis, S::Weight>, PmfError> {
        make_mixture(self.iter().map(|(_, suite, weight)| (suite.pmf(), weight)))
    }

    /// Distribution over `key(suite)` weighted by the top-level beliefs.
    ///
    /// Suites sharing a key have their weights summed.
    pub fn marginal<K, F>(&self, mut key: F) -> Pmf<K, S::Weight>
    where
        K: Clone + Eq + Hash + fmt::Debug,
        F: FnMut(&S) -> K,
    {
        let mut result = Pmf::new();
        for (_, suite, weight) in self.iter() {
            result.accumulate(key(suite), weight.clone());
        }
        result
    }

    /// First sub-suite whose `key` equals `target`.
    ///
    /// When several suites share the key the earliest constructed one wins.
    pub fn conditional<K, F>(&self, mut key: F, target: &K) -> Result<&S, PmfError>
    where
        K: PartialEq + fmt::Debug,
        F: FnMut(&S) -> K,
    {
        self.suites
            .iter()
            .find(|suite| key(suite) == *target)
            .ok_or_else(|| PmfError::NotFound {
                key: format!("{:?}", target),
            })
    }

    /// Pair every sub-suite of `self` with every sub-suite of `other`.
    ///
    /// `combiner` builds the joint bottom-level distribution for one pair;
    /// the pair's top-level weight is the product of both weights. Flatten
    /// the result with [`MetaPmf::mixture`].
    pub fn combine_suites<S2, H, F>(
        &self,
        other: &MetaSuite<S2>,
        mut combiner: F,
    ) -> Result<MetaPmf<H, S::Weight>, PmfError>
    where
        S2: Suite<Weight = S::Weight>,
        H: Clone + Eq + Hash + fmt::Debug,
        F: FnMut(&S, &S2) -> Pmf<H, S::Weight>,
    {
        let mut result = MetaPmf::new();
        for (_, a, wa) in self.iter() {
            for (_, b, wb) in other.iter() {
                result.push(combiner(a, b), wa.clone() * wb.clone())?;
            }
        }
        Ok(result)
    }

    /// Release the sub-suites in construction order.
    pub fn into_suites(self) -> Vec<S> {
        self.suites
    }
}

impl<S: Suite> Suite for MetaSuite<S> {
    type Hypothesis = SuiteId;
    type Data = S::Data;
    type Weight = S::Weight;
    type Error = S::Error;

    fn pmf(&self) -> &Pmf<SuiteId, S::Weight> {
        &self.pmf
    }

    /// Update every sub-suite with `data` and reweight the top level by the
    /// constants they report.
    ///
    /// Evidence is consumed at both levels, so calling this twice with the
    /// same datum counts it twice. A sub-suite for which `data` is impossible
    /// fails the whole update; sub-suites visited earlier keep their update.
    fn update(&mut self, data: &S::Data) -> Result<S::Weight, S::Error> {
        let suites = &mut self.suites;
        self.pmf
            .update_by(|id| consume_and_score(&mut suites[id.0], data))
    }
}
