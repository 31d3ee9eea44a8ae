use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A budget amount in currency units, with at most two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// `None` when `decimal` has more than two significant decimal places.
    pub fn from_decimal(decimal: Decimal) -> Option<Self> {
        (decimal.normalize().scale() <= 2).then_some(Money(decimal))
    }

    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Money {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = parse_decimal(s).map_err(|e| format!("Invalid amount '{s}': {e}"))?;
        Money::from_decimal(decimal)
            .ok_or_else(|| format!("Amount has more than two decimal places: '{s}'"))
    }
}

/// Parses a user-typed number. Accepts plain and scientific notation.
pub fn parse_decimal(s: &str) -> Result<Decimal, rust_decimal::Error> {
    let s = s.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    Decimal::from_str(s).or_else(|e| {
        if s.contains(['e', 'E']) {
            Decimal::from_scientific(s)
        } else {
            Err(e)
        }
    })
}
