//! Exact numeric values for configuration files.
//!
//! Probabilities in scenario files are kept as exact rationals so that
//! posteriors computed from them can be compared bit for bit. Accepted
//! spellings: fractions (`"1/10"`), integers (`"1"`), finite decimals
//! (`"0.1"`, `0.1`) and percentages (`"10%"`).

use std::fmt;
use std::str::FromStr;

use num::{BigInt, BigRational, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::validate::ValidationError;

/// Exact rational read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Exact(BigRational);

impl Exact {
    pub fn new(value: BigRational) -> Self {
        Exact(value)
    }

    pub fn value(&self) -> &BigRational {
        &self.0
    }

    pub fn into_inner(self) -> BigRational {
        self.0
    }
}

impl From<BigRational> for Exact {
    fn from(value: BigRational) -> Self {
        Exact(value)
    }
}

impl fmt::Display for Exact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Exact {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_exact(s).map(Exact)
    }
}

/// Parse a fraction, integer, finite decimal or percentage.
pub fn parse_exact(input: &str) -> Result<BigRational, ValidationError> {
    let invalid = |message: &str| ValidationError::InvalidNumber {
        input: input.to_string(),
        message: message.to_string(),
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty value"));
    }

    if let Some(percent) = trimmed.strip_suffix('%') {
        let value = parse_exact(percent)?;
        return Ok(value / BigRational::from_integer(BigInt::from(100)));
    }

    if let Some((numer, denom)) = trimmed.split_once('/') {
        let numer = parse_integer(numer.trim()).ok_or_else(|| invalid("bad numerator"))?;
        let denom = parse_integer(denom.trim()).ok_or_else(|| invalid("bad denominator"))?;
        if denom.is_zero() {
            return Err(invalid("zero denominator"));
        }
        return Ok(BigRational::new(numer, denom));
    }

    parse_decimal(trimmed).ok_or_else(|| invalid("expected a fraction, integer, decimal or percentage"))
}

fn parse_integer(s: &str) -> Option<BigInt> {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_decimal(s: &str) -> Option<BigRational> {
    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{}{}", whole, fraction);
    let numer: BigInt = digits.parse().ok()?;
    let denom = num::pow(BigInt::from(10), fraction.len());
    let value = BigRational::new(numer, denom);
    Some(if negative { -value } else { value })
}

impl Serialize for Exact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Exact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ExactVisitor)
    }
}

struct ExactVisitor;

impl<'de> Visitor<'de> for ExactVisitor {
    type Value = Exact;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a fraction string such as \"1/10\", a decimal, or an integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Exact, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Exact, E> {
        Ok(Exact(BigRational::from_integer(BigInt::from(v))))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Exact, E> {
        Ok(Exact(BigRational::from_integer(BigInt::from(v))))
    }

    /// Floats are read through their shortest decimal spelling, so `0.1`
    /// becomes exactly 1/10 rather than the nearest binary fraction.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Exact, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("non-finite value {}", v)));
        }
        v.to_string().parse().map_err(E::custom)
    }
}
