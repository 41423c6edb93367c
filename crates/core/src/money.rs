use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// How amounts are rendered in journal output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountFormat {
    pub currency: String,
    /// Place the currency after the number (`12.50 EUR`) instead of before (`$12.50`).
    pub suffixed: bool,
    pub comma_separates_cents: bool,
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self {
            currency: "$".to_string(),
            suffixed: false,
            comma_separates_cents: false,
        }
    }
}

/// Exact signed amount. Positive means money into the bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal)
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Renders with two decimals and the configured currency, e.g. `$-12.50`.
    pub fn pretty(self, format: &AmountFormat) -> String {
        let rounded = self.0.round_dp(2);
        // `-0.00` would never match a journal's `0.00`.
        let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
        let mut number = format!("{rounded:.2}");
        if format.comma_separates_cents {
            number = number.replace('.', ",");
        }
        if format.suffixed {
            format!("{number} {}", format.currency)
        } else {
            format!("{}{number}", format.currency)
        }
    }

    /// Parses journal or statement amount text such as `$-12.50`, `-$1,234.00`,
    /// `(75.25)` or `12,50 EUR`. Everything that is not a digit, sign or
    /// separator is treated as commodity and ignored.
    pub fn parse(text: &str, comma_separates_cents: bool) -> Result<Self, MoneyError> {
        let trimmed = text.trim();
        let (negative, body) = match trimmed
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
        {
            Some(inner) => (true, inner),
            None => (false, trimmed),
        };

        let mut digits: String = body
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | ','))
            .collect();
        if comma_separates_cents {
            digits = digits.replace('.', "").replace(',', ".");
        } else {
            digits = digits.replace(',', "");
        }
        let digits = digits.replace('+', "");
        let (minus, digits) = match digits.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, digits.as_str()),
        };

        let mut value = Decimal::from_str(digits)
            .map_err(|_| MoneyError::InvalidAmount(text.to_string()))?;
        if negative ^ minus {
            value = -value;
        }
        Ok(Money(value))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty(&AmountFormat::default()))
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self {
        Money(-self.0)
    }
}
