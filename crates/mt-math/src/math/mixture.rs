//! Mixtures of distributions.
//!
//! A meta-distribution assigns top-level weights to whole sub-distributions.
//! Flattening it (weighting every sub-distribution by its top-level weight
//! and summing) yields the marginal over the bottom-level hypotheses.

use std::fmt;
use std::hash::Hash;

use super::pmf::{Pmf, PmfError};
use super::weight::{Rational, Weight};

/// Weighted collection of sub-distributions.
///
/// Distributions are not hashable, so components are kept as an ordered
/// list rather than a mapping; identical components may appear twice.
#[derive(Debug, Clone)]
pub struct MetaPmf<H, W = Rational> {
    components: Vec<(Pmf<H, W>, W)>,
}

impl<H, W> Default for MetaPmf<H, W> {
    fn default() -> Self {
        Self {
            components: Vec::new(),
        }
    }
}

impl<H, W> MetaPmf<H, W>
where
    H: Clone + Eq + Hash + fmt::Debug,
    W: Weight,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component with top-level weight `weight`.
    pub fn push(&mut self, component: Pmf<H, W>, weight: W) -> Result<(), PmfError> {
        if !weight.is_valid_weight() {
            return Err(PmfError::InvalidWeight {
                hypothesis: format!("component #{}", self.components.len()),
                weight: weight.to_string(),
            });
        }
        self.components.push((component, weight));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> impl ExactSizeIterator<Item = (&Pmf<H, W>, &W)> + '_ {
        self.components.iter().map(|(pmf, w)| (pmf, w))
    }

    /// Flatten into the marginal distribution over bottom-level values.
    pub fn mixture(&self) -> Result<Pmf<H, W>, PmfError> {
        make_mixture(self.components())
    }
}

/// Marginal over bottom-level values of a weighted set of distributions.
///
/// Every `(value, sub_weight)` inside a component with top-level weight
/// `top_weight` contributes `top_weight * sub_weight` to `value`. The result
/// is normalized, so unnormalized inputs are averaged correctly.
pub fn make_mixture<'a, H, W, I>(components: I) -> Result<Pmf<H, W>, PmfError>
where
    H: Clone + Eq + Hash + fmt::Debug + 'a,
    W: Weight + 'a,
    I: IntoIterator<Item = (&'a Pmf<H, W>, &'a W)>,
{
    let mut mixture = Pmf::new();
    for (component, top_weight) in components {
        if !top_weight.is_valid_weight() {
            return Err(PmfError::invalid_weight(&"component", top_weight));
        }
        for (value, sub_weight) in component.items() {
            mixture.accumulate(value.clone(), top_weight.clone() * sub_weight.clone());
        }
    }
    mixture.normalize()?;
    Ok(mixture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pmf::concat;
    use crate::math::weight::ratio;

    fn bent_coin(heads: Rational) -> Pmf<&'static str> {
        let tails = ratio(1, 1) - heads.clone();
        Pmf::from_items([("heads", heads), ("tails", tails)]).unwrap()
    }

    #[test]
    fn mixture_averages_components() {
        let mut meta = MetaPmf::new();
        meta.push(bent_coin(ratio(1, 2)), ratio(1, 2)).unwrap();
        meta.push(bent_coin(ratio(1, 1)), ratio(1, 2)).unwrap();
        let mix = meta.mixture().unwrap();
        assert_eq!(mix.probability(&"heads"), ratio(3, 4));
        assert_eq!(mix.probability(&"tails"), ratio(1, 4));
    }

    #[test]
    fn mixture_normalizes_top_level_weights() {
        let mut meta = MetaPmf::new();
        meta.push(bent_coin(ratio(1, 4)), ratio(3, 1)).unwrap();
        meta.push(bent_coin(ratio(3, 4)), ratio(1, 1)).unwrap();
        let mix = meta.mixture().unwrap();
        assert_eq!(mix.probability(&"heads"), ratio(3, 8));
    }

    #[test]
    fn mixture_of_nothing_is_empty_error() {
        let meta: MetaPmf<&str> = MetaPmf::new();
        assert_eq!(meta.mixture(), Err(PmfError::EmptyDistribution));
    }

    #[test]
    fn push_rejects_negative_weight() {
        let mut meta = MetaPmf::new();
        let err = meta.push(bent_coin(ratio(1, 2)), ratio(-1, 2)).unwrap_err();
        assert!(matches!(err, PmfError::InvalidWeight { .. }));
        assert!(meta.is_empty());
    }

    #[test]
    fn mixture_then_convolve_matches_convolve_then_mixture() {
        let components = [(bent_coin(ratio(1, 3)), ratio(1, 4)), (bent_coin(ratio(4, 5)), ratio(3, 4))];

        let mut pairs = MetaPmf::new();
        for (a, wa) in &components {
            for (b, wb) in &components {
                pairs
                    .push(a.combine(b, concat), wa.clone() * wb.clone())
                    .unwrap();
            }
        }
        let joint_first = pairs.mixture().unwrap();

        let mix = make_mixture(components.iter().map(|(p, w)| (p, w))).unwrap();
        let mixture_first = mix.combine(&mix, concat);

        assert_eq!(joint_first, mixture_first);
    }
}
