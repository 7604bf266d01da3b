use std::fmt;
use std::ops::Add;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::{Serialize, Serializer};

/// An exact ingredient quantity.
///
/// Backed by an arbitrary-precision rational so fractions like 1/3 survive
/// repeated addition losslessly — never floating point. The empty input
/// string is zero for arithmetic but remembers that no quantity was ever
/// written down, and displays as "" again rather than "0".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantity {
    value: BigRational,
    specified: bool,
}

/// Why a quantity string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityParseError {
    /// Neither empty, integer, decimal, nor "a/b".
    Malformed(String),
    /// Fraction with a zero denominator, e.g. "1/0".
    ZeroDenominator(String),
}

impl fmt::Display for QuantityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "cannot parse quantity '{value}'"),
            Self::ZeroDenominator(value) => {
                write!(f, "quantity '{value}' has a zero denominator")
            }
        }
    }
}

impl std::error::Error for QuantityParseError {}

impl Quantity {
    /// The no-quantity-given value: zero for arithmetic, "" on display.
    pub fn none() -> Self {
        Quantity {
            value: BigRational::zero(),
            specified: false,
        }
    }

    pub fn from_integer(n: i64) -> Self {
        Quantity {
            value: BigRational::from_integer(BigInt::from(n)),
            specified: true,
        }
    }

    /// Exact ratio constructor, mostly for tests and fixtures.
    ///
    /// # Panics
    /// Panics if `denominator` is zero. Free-form input goes through
    /// [`Quantity::parse`], which reports a zero denominator as an error.
    pub fn from_ratio(numerator: i64, denominator: i64) -> Self {
        Quantity {
            value: BigRational::new(BigInt::from(numerator), BigInt::from(denominator)),
            specified: true,
        }
    }

    /// Parse a free-form quantity string.
    ///
    /// Accepted: empty, optionally signed integer ("2", "-3"), decimal
    /// ("2.5"), simple fraction ("1/2"). Leading/trailing whitespace is
    /// ignored.
    pub fn parse(input: &str) -> Result<Self, QuantityParseError> {
        let s = input.trim();
        if s.is_empty() {
            return Ok(Self::none());
        }

        if let Some((numer, denom)) = s.split_once('/') {
            let n: BigInt = numer
                .trim()
                .parse()
                .map_err(|_| QuantityParseError::Malformed(input.to_string()))?;
            let d: BigInt = denom
                .trim()
                .parse()
                .map_err(|_| QuantityParseError::Malformed(input.to_string()))?;
            if d.is_zero() {
                return Err(QuantityParseError::ZeroDenominator(input.to_string()));
            }
            return Ok(Quantity {
                value: BigRational::new(n, d),
                specified: true,
            });
        }

        if s.contains('.') {
            return parse_decimal(s)
                .map(|value| Quantity { value, specified: true })
                .ok_or_else(|| QuantityParseError::Malformed(input.to_string()));
        }

        let n: BigInt = s
            .parse()
            .map_err(|_| QuantityParseError::Malformed(input.to_string()))?;
        Ok(Quantity {
            value: BigRational::from_integer(n),
            specified: true,
        })
    }

    /// Whether any quantity was ever written down (by either operand of a
    /// sum).
    pub fn is_specified(&self) -> bool {
        self.specified
    }

    /// Exact `<= 0` comparison, used by the subtraction pass to decide
    /// which entries are exhausted.
    pub fn is_zero_or_less(&self) -> bool {
        !self.value.is_positive()
    }

    /// Negated copy. An unspecified quantity stays unspecified (empty stays
    /// empty).
    pub fn negated(&self) -> Self {
        Quantity {
            value: -self.value.clone(),
            specified: self.specified,
        }
    }
}

/// Decimal "a.b" with optional sign. Returns None on anything else.
fn parse_decimal(s: &str) -> Option<BigRational> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (int_part, frac_part) = rest.split_once('.')?;
    if frac_part.is_empty() || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !int_part.is_empty() && !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits: BigInt = format!("{int_part}{frac_part}").parse().ok()?;
    let scale = num_traits::pow(BigInt::from(10), frac_part.len());
    let value = BigRational::new(digits, scale);
    Some(if negative { -value } else { value })
}

impl Add<&Quantity> for &Quantity {
    type Output = Quantity;

    fn add(self, other: &Quantity) -> Quantity {
        Quantity {
            value: &self.value + &other.value,
            specified: self.specified || other.specified,
        }
    }
}

impl fmt::Display for Quantity {
    /// Canonical form: "" when never specified, integer when the reduced
    /// denominator is 1, otherwise "a/b".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.specified {
            return Ok(());
        }
        if self.value.denom().is_one() {
            write!(f, "{}", self.value.numer())
        } else {
            write!(f, "{}/{}", self.value.numer(), self.value.denom())
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Quantity {
        Quantity::parse(s).unwrap()
    }

    #[test]
    fn parse_integer_and_fraction() {
        assert_eq!(q("2"), Quantity::from_integer(2));
        assert_eq!(q("-3"), Quantity::from_integer(-3));
        assert_eq!(q("1/2"), Quantity::from_ratio(1, 2));
        assert_eq!(q(" 3 / 4 "), Quantity::from_ratio(3, 4));
    }

    #[test]
    fn parse_decimal_reduces() {
        assert_eq!(q("2.5"), Quantity::from_ratio(5, 2));
        assert_eq!(q("0.25"), Quantity::from_ratio(1, 4));
        assert_eq!(q("-0.5"), Quantity::from_ratio(-1, 2));
        assert_eq!(q(".5"), Quantity::from_ratio(1, 2));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            Quantity::parse("a pinch"),
            Err(QuantityParseError::Malformed(_))
        ));
        assert!(matches!(
            Quantity::parse("2.5.1"),
            Err(QuantityParseError::Malformed(_))
        ));
        assert!(matches!(
            Quantity::parse("1/2/3"),
            Err(QuantityParseError::Malformed(_))
        ));
    }

    #[test]
    fn zero_denominator_is_an_error_not_infinity() {
        assert_eq!(
            Quantity::parse("1/0"),
            Err(QuantityParseError::ZeroDenominator("1/0".to_string()))
        );
    }

    #[test]
    fn fraction_sum_is_exact() {
        // 1/2 + 1/3 + 1/6 = 1, no float drift allowed
        let sum = &(&q("1/2") + &q("1/3")) + &q("1/6");
        assert_eq!(sum, Quantity::from_integer(1));
        assert_eq!(sum.to_string(), "1");
    }

    #[test]
    fn half_plus_half_displays_as_one() {
        let sum = &q("1/2") + &q("1/2");
        assert_eq!(sum.to_string(), "1");
    }

    #[test]
    fn canonical_display_prefers_reduced_fraction() {
        assert_eq!(q("2/4").to_string(), "1/2");
        assert_eq!(q("2.5").to_string(), "5/2");
        assert_eq!(q("4/2").to_string(), "2");
    }

    #[test]
    fn empty_round_trips_to_empty() {
        let empty = q("");
        assert!(!empty.is_specified());
        assert_eq!(empty.to_string(), "");

        // Sum of two never-specified quantities is still unspecified
        let sum = &empty + &q("");
        assert_eq!(sum.to_string(), "");
    }

    #[test]
    fn specified_zero_displays_as_zero() {
        let sum = &q("1") + &q("-1");
        assert!(sum.is_specified());
        assert_eq!(sum.to_string(), "0");
    }

    #[test]
    fn empty_is_zero_for_arithmetic() {
        let sum = &q("") + &q("3/4");
        assert_eq!(sum, Quantity::from_ratio(3, 4));
        assert!(sum.is_specified());
    }

    #[test]
    fn negation_keeps_empty_empty() {
        assert_eq!(q("").negated().to_string(), "");
        assert_eq!(q("1/2").negated(), Quantity::from_ratio(-1, 2));
    }

    #[test]
    fn zero_or_less() {
        assert!(q("0").is_zero_or_less());
        assert!(q("-1/2").is_zero_or_less());
        assert!(q("").is_zero_or_less());
        assert!(!q("1/3").is_zero_or_less());
    }
}
