//! Fixed-point currency amount matching the SQL `money` type.
//!
//! # Invariants
//! - Amounts carry exactly four decimal places.
//! - Internally stored as a signed count of ten-thousandths.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

const SCALE: i64 = 10_000;
const SCALE_DIGITS: usize = 4;

/// Currency amount with four decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("money amount cannot be empty")]
    Empty,
    #[error("invalid money amount `{0}`")]
    Invalid(String),
    #[error("money amount `{0}` has more than 4 decimal places")]
    TooPrecise(String),
    #[error("money amount `{0}` is out of range")]
    OutOfRange(String),
}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Builds an amount from ten-thousandths, the storage representation.
    pub const fn from_minor_units(units: i64) -> Self {
        Self(units)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Builds an amount from whole currency units.
    pub fn from_whole(units: i64) -> Option<Self> {
        units.checked_mul(SCALE).map(Self)
    }

    /// Rounds a floating point amount to four decimal places.
    ///
    /// Returns `None` for non-finite or out-of-range values.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * SCALE as f64).round();
        if scaled < i64::MIN as f64 || scaled > i64::MAX as f64 {
            return None;
        }
        Some(Self(scaled as i64))
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(MoneyParseError::Invalid(trimmed.to_string()));
        }
        if fraction.len() > SCALE_DIGITS {
            return Err(MoneyParseError::TooPrecise(trimmed.to_string()));
        }

        let out_of_range = || MoneyParseError::OutOfRange(trimmed.to_string());
        let whole_units = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|_| out_of_range())?
        };
        let fraction_units = format!("{fraction:0<width$}", width = SCALE_DIGITS)
            .parse::<i64>()
            .map_err(|_| MoneyParseError::Invalid(trimmed.to_string()))?;

        let magnitude = whole_units
            .checked_mul(SCALE)
            .and_then(|value| value.checked_add(fraction_units))
            .ok_or_else(out_of_range)?;

        Ok(Self(if negative { -magnitude } else { magnitude }))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let scale = SCALE as u64;
        write!(
            f,
            "{sign}{}.{:0width$}",
            magnitude / scale,
            magnitude % scale,
            width = SCALE_DIGITS
        )
    }
}

/// Serialized as a decimal string to stay lossless.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts JSON numbers as well as decimal strings.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a currency amount as a number or decimal string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
        Money::from_whole(value).ok_or_else(|| out_of_range_error(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
        i64::try_from(value)
            .ok()
            .and_then(Money::from_whole)
            .ok_or_else(|| out_of_range_error(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
        Money::from_f64(value).ok_or_else(|| out_of_range_error(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Money, E> {
        value.parse().map_err(E::custom)
    }
}

fn out_of_range_error<E: de::Error>(value: impl Display) -> E {
    E::custom(format!("money amount {value} is out of range"))
}

#[cfg(test)]
mod tests {
    use super::{Money, MoneyParseError};

    #[test]
    fn parses_decimal_strings() {
        assert_eq!("12.5".parse::<Money>().unwrap().minor_units(), 125_000);
        assert_eq!("-0.0001".parse::<Money>().unwrap().minor_units(), -1);
        assert_eq!(".25".parse::<Money>().unwrap().minor_units(), 2_500);
        assert_eq!("7".parse::<Money>().unwrap(), Money::from_whole(7).unwrap());
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!("".parse::<Money>(), Err(MoneyParseError::Empty));
        assert!(matches!("1.2.3".parse::<Money>(), Err(MoneyParseError::Invalid(_))));
        assert!(matches!("abc".parse::<Money>(), Err(MoneyParseError::Invalid(_))));
        assert!(matches!("1.00001".parse::<Money>(), Err(MoneyParseError::TooPrecise(_))));
        assert!(matches!(
            "99999999999999999999".parse::<Money>(),
            Err(MoneyParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn displays_four_decimal_places() {
        assert_eq!(Money::ZERO.to_string(), "0.0000");
        assert_eq!(Money::from_minor_units(-125_050).to_string(), "-12.5050");
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let from_int: Money = serde_json::from_str("3").unwrap();
        let from_float: Money = serde_json::from_str("2.75").unwrap();
        let from_text: Money = serde_json::from_str("\"1.1\"").unwrap();

        assert_eq!(from_int.minor_units(), 30_000);
        assert_eq!(from_float.minor_units(), 27_500);
        assert_eq!(from_text.minor_units(), 11_000);
        assert!(serde_json::from_str::<Money>("true").is_err());

        let err = serde_json::from_str::<Money>("9223372036854775807").unwrap_err();
        assert!(err.to_string().contains("is out of range"), "{err}");
    }
}
