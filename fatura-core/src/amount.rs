//! Fixed-point money amounts.
//!
//! Statement values are printed in Brazilian notation (`1.234,56`): dots group
//! thousands and a comma separates the two decimal places. Amounts are kept as
//! integer cents so that totals and dedup keys are exact.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Money amount in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_cents(cents: i64) -> Self {
        Amount(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parse a Brazilian-notation amount such as `1.234,56`, `89,90` or `-12,00`.
    ///
    /// Exactly two decimal places are required. Returns `None` for anything else.
    pub fn parse_br(s: &str) -> Option<Amount> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (int_part, frac_part) = digits.rsplit_once(',')?;
        if frac_part.len() != 2 || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let int_digits: String = int_part.chars().filter(|c| *c != '.').collect();
        if !int_digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // ".,50" is how some layouts print fifty cents
        let units: i64 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().ok()?
        };
        let frac: i64 = frac_part.parse().ok()?;

        let cents = units.checked_mul(100)?.checked_add(frac)?;
        Some(Amount(if negative { -cents } else { cents }))
    }

    /// Render in Brazilian notation, e.g. `1.234,56`.
    pub fn to_br_string(self) -> String {
        let abs = self.0.unsigned_abs();
        let units = (abs / 100).to_string();
        let frac = abs % 100;

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, ch) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{sign}{grouped},{frac:02}")
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Amount {
    type Output = Amount;

    /// Saturates at the i64 cent limits instead of overflowing.
    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

/// Serialized as a decimal number (`123.45`) so JSON consumers see plain values.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Amount((value * 100.0).round() as i64))
    }
}
