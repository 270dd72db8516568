//! Numeric representation for probability weights.
//!
//! Weights are either exact rationals (`BigRational`, the default) or `f64`.
//! Exact arithmetic keeps posteriors bit-reproducible; floats trade that for
//! speed and carry the usual rounding error.

use std::fmt;

use num::{BigInt, BigRational, Num, ToPrimitive};

/// Exact rational weight.
pub type Rational = BigRational;

/// Arithmetic a PMF needs from its weights.
///
/// Anything that supports the field operations, comparison with zero and a
/// lossy conversion to `f64` (used only for sampling) qualifies.
pub trait Weight: Num + Clone + PartialOrd + fmt::Debug + fmt::Display + ToPrimitive {
    /// True when the value is a usable weight: non-negative and comparable.
    ///
    /// NaN fails this check because it is not `>= 0`.
    fn is_valid_weight(&self) -> bool {
        *self >= Self::zero()
    }

    /// Complement `1 - self`.
    fn complement(&self) -> Self {
        Self::one() - self.clone()
    }
}

impl<T> Weight for T where T: Num + Clone + PartialOrd + fmt::Debug + fmt::Display + ToPrimitive {}

/// Build the exact rational `numer / denom`.
///
/// # Panics
/// Panics when `denom` is zero.
pub fn ratio(numer: i64, denom: i64) -> Rational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}
