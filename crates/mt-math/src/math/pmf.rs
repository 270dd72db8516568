//! Probability mass functions over discrete hypotheses.
//!
//! A [`Pmf`] maps hypotheses to non-negative weights and keeps insertion
//! order, so iteration, display and sampling are deterministic for a given
//! construction sequence. Weights are never normalized implicitly: callers
//! invoke [`Pmf::normalize`] after any run of increments and before treating
//! the weights as probabilities.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::Add;

use rand::Rng;
use thiserror::Error;

use super::weight::{Rational, Weight};

/// Errors raised by distribution operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PmfError {
    #[error("invalid weight {weight} for hypothesis {hypothesis}")]
    InvalidWeight { hypothesis: String, weight: String },
    #[error("total probability is zero: the evidence is impossible under every hypothesis")]
    ZeroTotalProbability,
    #[error("distribution has no hypotheses")]
    EmptyDistribution,
    #[error("no hypothesis matches key {key}")]
    NotFound { key: String },
}

impl PmfError {
    pub(crate) fn invalid_weight<H: fmt::Debug, W: fmt::Display>(hypothesis: &H, weight: &W) -> Self {
        PmfError::InvalidWeight {
            hypothesis: format!("{:?}", hypothesis),
            weight: weight.to_string(),
        }
    }
}

/// Insertion-ordered mapping from hypothesis to weight.
#[derive(Clone)]
pub struct Pmf<H, W = Rational> {
    entries: Vec<(H, W)>,
    index: HashMap<H, usize>,
}

impl<H, W> Default for Pmf<H, W> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<H, W> Pmf<H, W> {
    /// Empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hypothesis, weight)` pairs in insertion order.
    ///
    /// Each call starts a fresh traversal.
    pub fn items(&self) -> impl ExactSizeIterator<Item = (&H, &W)> + Clone + '_ {
        self.entries.iter().map(|(h, w)| (h, w))
    }

    /// Hypotheses in insertion order.
    pub fn hypotheses(&self) -> impl ExactSizeIterator<Item = &H> + Clone + '_ {
        self.entries.iter().map(|(h, _)| h)
    }
}

impl<H, W> Pmf<H, W>
where
    H: Clone + Eq + Hash + fmt::Debug,
    W: Weight,
{
    /// Build from `(hypothesis, weight)` pairs; repeated hypotheses accumulate.
    pub fn from_items<I>(items: I) -> Result<Self, PmfError>
    where
        I: IntoIterator<Item = (H, W)>,
    {
        let mut pmf = Self::new();
        for (hypothesis, weight) in items {
            pmf.increment(hypothesis, weight)?;
        }
        Ok(pmf)
    }

    /// Build from a sequence where every occurrence contributes weight one.
    ///
    /// The result is unnormalized; duplicates count once per occurrence.
    pub fn uniform<I>(values: I) -> Self
    where
        I: IntoIterator<Item = H>,
    {
        let mut pmf = Self::new();
        for value in values {
            pmf.accumulate(value, W::one());
        }
        pmf
    }

    /// Set the weight of `hypothesis`, replacing any previous weight.
    pub fn set(&mut self, hypothesis: H, weight: W) -> Result<(), PmfError> {
        if !weight.is_valid_weight() {
            return Err(PmfError::invalid_weight(&hypothesis, &weight));
        }
        match self.index.get(&hypothesis) {
            Some(&slot) => self.entries[slot].1 = weight,
            None => self.push(hypothesis, weight),
        }
        Ok(())
    }

    /// Add `delta` to the weight of `hypothesis`, creating it if absent.
    pub fn increment(&mut self, hypothesis: H, delta: W) -> Result<(), PmfError> {
        if !delta.is_valid_weight() {
            return Err(PmfError::invalid_weight(&hypothesis, &delta));
        }
        self.accumulate(hypothesis, delta);
        Ok(())
    }

    /// Multiply the weight of `hypothesis` by `factor`. Absent hypotheses are
    /// left absent.
    pub fn scale(&mut self, hypothesis: &H, factor: W) -> Result<(), PmfError> {
        if !factor.is_valid_weight() {
            return Err(PmfError::invalid_weight(hypothesis, &factor));
        }
        if let Some(&slot) = self.index.get(hypothesis) {
            let weight = &mut self.entries[slot].1;
            *weight = weight.clone() * factor;
        }
        Ok(())
    }

    /// Remove `hypothesis`, returning its weight.
    pub fn remove(&mut self, hypothesis: &H) -> Option<W> {
        let slot = self.index.remove(hypothesis)?;
        let (_, weight) = self.entries.remove(slot);
        for (h, _) in &self.entries[slot..] {
            if let Some(position) = self.index.get_mut(h) {
                *position -= 1;
            }
        }
        Some(weight)
    }

    /// Weight of `hypothesis`, zero when absent.
    pub fn probability(&self, hypothesis: &H) -> W {
        self.get(hypothesis).cloned().unwrap_or_else(W::zero)
    }

    pub fn get(&self, hypothesis: &H) -> Option<&W> {
        self.index.get(hypothesis).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains(&self, hypothesis: &H) -> bool {
        self.index.contains_key(hypothesis)
    }

    /// Sum of all weights.
    pub fn total(&self) -> W {
        self.entries
            .iter()
            .fold(W::zero(), |acc, (_, w)| acc + w.clone())
    }

    /// Divide every weight by the total and return that total.
    ///
    /// Calling it again immediately returns one and changes nothing.
    pub fn normalize(&mut self) -> Result<W, PmfError> {
        if self.entries.is_empty() {
            return Err(PmfError::EmptyDistribution);
        }
        let total = self.total();
        if total.is_zero() {
            return Err(PmfError::ZeroTotalProbability);
        }
        if !total.is_one() {
            for (_, weight) in &mut self.entries {
                *weight = weight.clone() / total.clone();
            }
        }
        Ok(total)
    }

    /// Multiply every weight by `likelihood(hypothesis)` and normalize.
    ///
    /// Returns the pre-normalization total, i.e. the probability of the
    /// evidence under the current beliefs. If `likelihood` fails part way,
    /// the weights already visited stay multiplied.
    pub fn update_by<F, E>(&mut self, mut likelihood: F) -> Result<W, E>
    where
        F: FnMut(&H) -> Result<W, E>,
        E: From<PmfError>,
    {
        for (hypothesis, weight) in &mut self.entries {
            let factor = likelihood(&*hypothesis)?;
            if !factor.is_valid_weight() {
                return Err(PmfError::invalid_weight(&*hypothesis, &factor).into());
            }
            *weight = weight.clone() * factor;
        }
        Ok(self.normalize()?)
    }

    /// Draw a hypothesis with probability proportional to its weight.
    pub fn sample<R>(&self, rng: &mut R) -> Result<&H, PmfError>
    where
        R: Rng + ?Sized,
    {
        if self.entries.is_empty() {
            return Err(PmfError::EmptyDistribution);
        }
        let mut cumulative = Vec::with_capacity(self.entries.len());
        let mut running = 0.0_f64;
        for (hypothesis, weight) in &self.entries {
            let value = weight
                .to_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PmfError::invalid_weight(hypothesis, weight))?;
            running += value;
            cumulative.push(running);
        }
        if running <= 0.0 {
            return Err(PmfError::ZeroTotalProbability);
        }

        let target = rng.random::<f64>() * running;
        let slot = cumulative.partition_point(|&edge| edge <= target);
        if slot < self.entries.len() {
            return Ok(&self.entries[slot].0);
        }
        // Rounding can push the target past the last edge; fall back to the
        // last hypothesis that carries weight.
        let last = cumulative
            .iter()
            .enumerate()
            .rev()
            .find(|&(i, &edge)| i == 0 || edge > cumulative[i - 1])
            .map(|(i, _)| i)
            .unwrap_or(0);
        Ok(&self.entries[last].0)
    }

    /// Generalized convolution.
    ///
    /// For every pair `(x, y)` the result gains `combiner(x, y)` with weight
    /// `weight(x) * weight(y)`; colliding outcomes are summed.
    pub fn combine<H2, H3, F>(&self, other: &Pmf<H2, W>, mut combiner: F) -> Pmf<H3, W>
    where
        H3: Clone + Eq + Hash + fmt::Debug,
        F: FnMut(&H, &H2) -> H3,
    {
        let mut result = Pmf::new();
        for (x, wx) in &self.entries {
            for (y, wy) in &other.entries {
                result.accumulate(combiner(x, y), wx.clone() * wy.clone());
            }
        }
        result
    }

    /// Distribution of the sum of two independent values.
    pub fn add(&self, other: &Self) -> Self
    where
        H: Add<Output = H>,
    {
        self.combine(other, |x, y| x.clone() + y.clone())
    }

    /// Push the distribution through `f`, summing weights that collide.
    pub fn map<K, F>(&self, mut f: F) -> Pmf<K, W>
    where
        K: Clone + Eq + Hash + fmt::Debug,
        F: FnMut(&H) -> K,
    {
        let mut result = Pmf::new();
        for (hypothesis, weight) in &self.entries {
            result.accumulate(f(hypothesis), weight.clone());
        }
        result
    }

    /// Hypothesis with the largest weight; ties go to the earliest inserted.
    pub fn max_likelihood(&self) -> Option<&H> {
        let mut best: Option<&(H, W)> = None;
        for entry in &self.entries {
            match best {
                Some((_, w)) if entry.1 <= *w => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(h, _)| h)
    }

    /// Expected value of `f` under the normalized distribution.
    pub fn expectation<F>(&self, mut f: F) -> Result<W, PmfError>
    where
        F: FnMut(&H) -> W,
    {
        if self.entries.is_empty() {
            return Err(PmfError::EmptyDistribution);
        }
        let total = self.total();
        if total.is_zero() {
            return Err(PmfError::ZeroTotalProbability);
        }
        let sum = self
            .entries
            .iter()
            .fold(W::zero(), |acc, (h, w)| acc + w.clone() * f(h));
        Ok(sum / total)
    }

    /// Add without validation; callers guarantee `weight` is non-negative.
    pub(crate) fn accumulate(&mut self, hypothesis: H, weight: W) {
        match self.index.get(&hypothesis) {
            Some(&slot) => {
                let current = &mut self.entries[slot].1;
                *current = current.clone() + weight;
            }
            None => self.push(hypothesis, weight),
        }
    }

    fn push(&mut self, hypothesis: H, weight: W) {
        self.index.insert(hypothesis.clone(), self.entries.len());
        self.entries.push((hypothesis, weight));
    }
}

impl<H, W> Pmf<H, W>
where
    H: Ord + fmt::Display,
    W: fmt::Display,
{
    /// Render as `hypothesis weight` lines sorted by hypothesis.
    pub fn render_sorted(&self) -> String {
        let mut sorted: Vec<&(H, W)> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let mut out = String::new();
        for (h, w) in sorted {
            out.push_str(&format!("{} {}\n", h, w));
        }
        out
    }
}

/// Equality as distributions: same hypotheses with equal weights, in any
/// insertion order.
impl<H, W> PartialEq for Pmf<H, W>
where
    H: Eq + Hash,
    W: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(h, w)| {
                other
                    .index
                    .get(h)
                    .is_some_and(|&slot| other.entries[slot].1 == *w)
            })
    }
}

impl<H, W> fmt::Debug for Pmf<H, W>
where
    H: fmt::Debug,
    W: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(h, w)| (h, w)))
            .finish()
    }
}

/// `hypothesis weight` lines in insertion order.
impl<H, W> fmt::Display for Pmf<H, W>
where
    H: fmt::Display,
    W: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (h, w) in &self.entries {
            writeln!(f, "{} {}", h, w)?;
        }
        Ok(())
    }
}

/// Combiner that concatenates the display forms of both outcomes.
///
/// Joint sick/notsick states of two patients become labels such as
/// `"sicksick"` or `"sicknotsick"`.
pub fn concat<A, B>(a: &A, b: &B) -> String
where
    A: fmt::Display + ?Sized,
    B: fmt::Display + ?Sized,
{
    format!("{}{}", a, b)
}
