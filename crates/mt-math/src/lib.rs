//! Discrete Bayesian inference primitives for medtest.
//!
//! Everything here is generic over the hypothesis type and the weight type
//! (exact `BigRational` by default, `f64` where speed matters more than
//! bit-exact posteriors).

pub mod math;

pub use math::hierarchy::{consume_and_score, MetaSuite, SuiteId};
pub use math::mixture::{make_mixture, MetaPmf};
pub use math::pmf::{concat, Pmf, PmfError};
pub use math::suite::{bayes_update, Likelihood, Suite};
pub use math::weight::{ratio, Rational, Weight};
