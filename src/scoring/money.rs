use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// Currency amount in minor units (paise), so sums and comparisons stay exact.
///
/// Serializes as the raw minor-unit integer; `Display` renders major units
/// with two decimals for reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Scale by a unit count (exposure = unit cost x quantity).
    pub const fn times(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(quantity as i64))
    }

    /// Apply a percentage discount, rounding half-up to the minor unit.
    pub fn discounted(self, discount_pct: u8) -> Money {
        let pct = i64::from(discount_pct.min(100));
        let scaled = self.0.saturating_mul(100 - pct);
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        Money(rounded)
    }
}

/// Failure to parse a decimal currency string.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid currency amount")]
pub struct MoneyParseError(String);

impl std::str::FromStr for Money {
    type Err = MoneyParseError;

    /// Parse a decimal string ("123.45", "-0.5", "200") without going through
    /// floating point, so no precision is lost.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let err = || MoneyParseError(raw.to_string());

        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (major_part, minor_part) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major_part.is_empty() && minor_part.is_empty() {
            return Err(err());
        }
        if minor_part.len() > 2 {
            return Err(err());
        }

        let major: i64 = if major_part.is_empty() {
            0
        } else {
            major_part.parse().map_err(|_| err())?
        };

        let minor: i64 = if minor_part.is_empty() {
            0
        } else {
            let padded = format!("{minor_part:0<2}");
            padded.parse().map_err(|_| err())?
        };

        let magnitude = major
            .checked_mul(100)
            .and_then(|m| m.checked_add(minor))
            .ok_or_else(err)?;

        Ok(Money(if negative { -magnitude } else { magnitude }))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_percent_off_two_hundred_is_one_hundred() {
        assert_eq!(Money::from_major(200).discounted(50), Money::from_major(100));
    }

    #[test]
    fn discount_rounds_half_up_at_the_minor_unit() {
        // 0.05 at 10% off = 0.045, rounds to 0.05
        assert_eq!(Money::from_minor(5).discounted(10), Money::from_minor(5));
        // 0.15 at 10% off = 0.135, rounds to 0.14
        assert_eq!(Money::from_minor(15).discounted(10), Money::from_minor(14));
    }

    #[test]
    fn zero_discount_is_identity() {
        assert_eq!(Money::from_minor(12_345).discounted(0), Money::from_minor(12_345));
    }

    #[test]
    fn sums_are_exact_over_minor_units() {
        let total: Money = [Money::from_minor(1), Money::from_minor(2), Money::from_minor(997)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_minor(1_000));
    }

    #[test]
    fn exposure_scales_by_quantity() {
        assert_eq!(Money::from_major(40).times(12), Money::from_major(480));
    }

    #[test]
    fn parses_decimal_strings_exactly() {
        assert_eq!("200".parse::<Money>(), Ok(Money::from_major(200)));
        assert_eq!("123.45".parse::<Money>(), Ok(Money::from_minor(12_345)));
        assert_eq!("0.5".parse::<Money>(), Ok(Money::from_minor(50)));
        assert_eq!("-40.25".parse::<Money>(), Ok(Money::from_minor(-4_025)));
    }

    #[test]
    fn rejects_malformed_currency_strings() {
        assert!("".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("12a".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
    }

    #[test]
    fn displays_major_units_with_two_decimals() {
        assert_eq!(Money::from_minor(12_345).to_string(), "123.45");
        assert_eq!(Money::from_minor(-50).to_string(), "-0.50");
    }
}
