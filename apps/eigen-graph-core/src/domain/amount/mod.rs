//! Atomic Token Amounts
//!
//! Arbitrary-precision unsigned amounts in the smallest indivisible token
//! unit. Amounts arrive on the wire as decimal strings (observed values up
//! to ~10^39, far past `f64`'s 2^53 integer range) and every arithmetic
//! operation on them stays in big-integer space: summation, comparison,
//! and proportion are exact, with conversion to floating point allowed
//! only after all proportion logic has run.

pub mod format;

pub use format::{NAN_LABEL, format_compact, format_power_of_ten, format_scientific};

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;

/// Errors produced when parsing a decimal amount string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAmountError {
    /// The input string was empty.
    #[error("empty amount string")]
    Empty,
    /// The input contained a character other than an ASCII digit.
    #[error("invalid character in amount string: {0:?}")]
    InvalidDigit(char),
}

/// A non-negative token amount of unbounded magnitude.
///
/// Immutable once constructed; combining amounts always produces a new
/// value. The inner representation is a [`BigUint`], so sums and
/// comparisons never pass through a lossy floating-point intermediate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AtomicAmount(BigUint);

impl AtomicAmount {
    /// The zero amount.
    #[must_use]
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Check whether this amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Number of decimal digits in the canonical rendering.
    ///
    /// Zero has one digit.
    #[must_use]
    pub fn decimal_digits(&self) -> usize {
        if self.0.is_zero() {
            1
        } else {
            self.0.to_str_radix(10).len()
        }
    }

    /// Borrow the underlying big integer.
    #[must_use]
    pub const fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Consume the amount, yielding the underlying big integer.
    #[must_use]
    pub fn into_biguint(self) -> BigUint {
        self.0
    }
}

impl FromStr for AtomicAmount {
    type Err = ParseAmountError;

    /// Parse a decimal-digit string.
    ///
    /// Only plain non-negative integer literals are accepted: no sign, no
    /// whitespace, no separators. This mirrors the wire format, where
    /// amounts are always canonical decimal strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseAmountError::Empty);
        }
        if let Some(bad) = s.chars().find(|c| !c.is_ascii_digit()) {
            return Err(ParseAmountError::InvalidDigit(bad));
        }
        // All-digit input cannot fail to parse in radix 10.
        let value = BigUint::parse_bytes(s.as_bytes(), 10).unwrap_or_default();
        Ok(Self(value))
    }
}

impl fmt::Display for AtomicAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_str_radix(10))
    }
}

impl From<u64> for AtomicAmount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for AtomicAmount {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for AtomicAmount {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl Add for AtomicAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Add<&Self> for AtomicAmount {
    type Output = Self;

    fn add(self, rhs: &Self) -> Self {
        Self(self.0 + &rhs.0)
    }
}

impl AddAssign<&Self> for AtomicAmount {
    fn add_assign(&mut self, rhs: &Self) {
        self.0 += &rhs.0;
    }
}

impl Sum for AtomicAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl Zero for AtomicAmount {
    fn zero() -> Self {
        Self::zero()
    }

    fn is_zero(&self) -> bool {
        self.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimal_strings() {
        let amount: AtomicAmount = "123456789".parse().unwrap();
        assert_eq!(amount.to_string(), "123456789");
    }

    #[test]
    fn parses_values_beyond_u128() {
        let digits = "123456789012345678901234567890123456789";
        let amount: AtomicAmount = digits.parse().unwrap();
        assert_eq!(amount.to_string(), digits);
        assert_eq!(amount.decimal_digits(), 39);
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(
            "".parse::<AtomicAmount>().unwrap_err(),
            ParseAmountError::Empty
        );
    }

    #[test]
    fn rejects_signs_whitespace_and_noise() {
        for input in ["-1", "+1", " 1", "1 ", "1.5", "1e5", "0x10", "not a number"] {
            assert!(
                matches!(
                    input.parse::<AtomicAmount>(),
                    Err(ParseAmountError::InvalidDigit(_))
                ),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn zero_round_trips() {
        let zero: AtomicAmount = "0".parse().unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero.decimal_digits(), 1);
        assert_eq!(zero.to_string(), "0");
    }

    #[test]
    fn addition_is_exact_at_large_magnitudes() {
        // 10^38 + 10^38 cannot be represented exactly in f64.
        let a: AtomicAmount = "100000000000000000000000000000000000001".parse().unwrap();
        let b: AtomicAmount = "100000000000000000000000000000000000001".parse().unwrap();
        assert_eq!(
            (a + b).to_string(),
            "200000000000000000000000000000000000002"
        );
    }

    #[test]
    fn ordering_is_numeric_not_lexicographic() {
        let small: AtomicAmount = "99".parse().unwrap();
        let large: AtomicAmount = "100".parse().unwrap();
        assert!(small < large);
    }

    #[test]
    fn sum_over_iterator() {
        let total: AtomicAmount = ["1", "2", "3"]
            .iter()
            .map(|s| s.parse::<AtomicAmount>().unwrap())
            .sum();
        assert_eq!(total.to_string(), "6");
    }
}
