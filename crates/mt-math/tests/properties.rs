//! Property-based tests for mt-math distributions.
//!
//! Uses proptest to check the algebraic laws of normalization, updating and
//! convolution across many random exact-rational inputs.

use mt_math::{concat, make_mixture, ratio, MetaPmf, Pmf, PmfError, Rational};
use num::{One, Zero};
use proptest::prelude::*;

/// Weights as small non-negative integers over a common denominator, with
/// at least one strictly positive entry.
fn weights(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..20, 1..max_len)
        .prop_filter("needs a positive weight", |ws| ws.iter().any(|&w| w > 0))
}

fn pmf_from(ws: &[i64]) -> Pmf<usize> {
    Pmf::from_items(ws.iter().enumerate().map(|(i, &w)| (i, ratio(w, 7)))).unwrap()
}

fn likelihoods(len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1i64..10, len)
}

// ============================================================================
// Normalization
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// After normalization the weights sum to exactly one.
    #[test]
    fn normalized_total_is_one(ws in weights(12)) {
        let mut pmf = pmf_from(&ws);
        let total = pmf.normalize().unwrap();
        prop_assert_eq!(total, ratio(ws.iter().sum::<i64>(), 7));
        prop_assert!(pmf.total().is_one());
    }

    /// A second normalize is a no-op that reports a total of one.
    #[test]
    fn normalize_is_idempotent(ws in weights(12)) {
        let mut pmf = pmf_from(&ws);
        pmf.normalize().unwrap();
        let once = pmf.clone();
        prop_assert!(pmf.normalize().unwrap().is_one());
        prop_assert_eq!(pmf, once);
    }

    /// All-zero weights can never be normalized.
    #[test]
    fn all_zero_weights_fail(len in 1usize..10) {
        let mut pmf: Pmf<usize> = Pmf::from_items((0..len).map(|i| (i, Rational::zero()))).unwrap();
        prop_assert_eq!(pmf.normalize(), Err(PmfError::ZeroTotalProbability));
    }

    /// Rebuilding a distribution from its own items reproduces it.
    #[test]
    fn items_round_trip(ws in weights(12)) {
        let mut pmf = pmf_from(&ws);
        pmf.normalize().unwrap();
        let rebuilt = Pmf::from_items(pmf.items().map(|(h, w)| (*h, w.clone()))).unwrap();
        prop_assert_eq!(rebuilt, pmf);
    }
}

// ============================================================================
// Updating
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Two sequential updates equal one update by the product likelihood.
    #[test]
    fn sequential_update_matches_product(
        (ws, first, second) in weights(8).prop_flat_map(|ws| {
            let len = ws.len();
            (Just(ws), likelihoods(len), likelihoods(len))
        })
    ) {
        let mut sequential = pmf_from(&ws);
        sequential.normalize().unwrap();
        let mut batch = sequential.clone();

        sequential.update_by(|&i| Ok::<_, PmfError>(ratio(first[i], 10))).unwrap();
        sequential.update_by(|&i| Ok::<_, PmfError>(ratio(second[i], 10))).unwrap();
        batch.update_by(|&i| Ok::<_, PmfError>(ratio(first[i] * second[i], 100))).unwrap();

        prop_assert_eq!(sequential, batch);
    }

    /// The normalizing constant is the prior expectation of the likelihood.
    #[test]
    fn update_constant_is_expected_likelihood(
        (ws, lik) in weights(8).prop_flat_map(|ws| {
            let len = ws.len();
            (Just(ws), likelihoods(len))
        })
    ) {
        let mut pmf = pmf_from(&ws);
        pmf.normalize().unwrap();
        let expected = pmf.expectation(|&i| ratio(lik[i], 10)).unwrap();
        let constant = pmf.update_by(|&i| Ok::<_, PmfError>(ratio(lik[i], 10))).unwrap();
        prop_assert_eq!(constant, expected);
    }
}

// ============================================================================
// Convolution and mixtures
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Convolution of normalized distributions stays normalized.
    #[test]
    fn combine_preserves_total(a in weights(6), b in weights(6)) {
        let mut left = pmf_from(&a);
        let mut right = pmf_from(&b);
        left.normalize().unwrap();
        right.normalize().unwrap();
        prop_assert!(left.add(&right).total().is_one());
    }

    /// Swapping operands of a commutative combiner gives the same result.
    #[test]
    fn add_is_commutative(a in weights(6), b in weights(6)) {
        let left = pmf_from(&a);
        let right = pmf_from(&b);
        prop_assert_eq!(left.add(&right), right.add(&left));
    }

    /// Mixing pairwise convolutions equals convolving the mixtures.
    #[test]
    fn mixture_commutes_with_convolution(
        a in weights(4),
        b in weights(4),
        top_a in 1i64..10,
        top_b in 1i64..10,
    ) {
        let mut pa = pmf_from(&a);
        let mut pb = pmf_from(&b);
        pa.normalize().unwrap();
        pb.normalize().unwrap();
        let components = [(pa, ratio(top_a, 1)), (pb, ratio(top_b, 1))];

        let mut pairs = MetaPmf::new();
        for (x, wx) in &components {
            for (y, wy) in &components {
                pairs.push(x.combine(y, concat), wx.clone() * wy.clone()).unwrap();
            }
        }
        let joint = pairs.mixture().unwrap();

        let mix = make_mixture(components.iter().map(|(p, w)| (p, w))).unwrap();
        prop_assert_eq!(joint, mix.combine(&mix, concat));
    }
}
