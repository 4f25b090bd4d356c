//! Fixed-point money amounts.
//!
//! Amounts are kept as a signed count of cents (two decimal places) to avoid
//! floating-point drift. A positive amount is a top-up, a negative one a
//! withdrawal.

use std::fmt;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

/// Number of decimal places an amount may carry.
pub const SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount must have at most two decimal places")]
    TooPrecise,
    #[error("amount is out of range")]
    OutOfRange,
}

/// A signed amount of money with exactly two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Converts a decimal into an amount, rejecting sub-cent precision.
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        let value = value.normalize();
        if value.scale() > SCALE {
            return Err(AmountError::TooPrecise);
        }
        value
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .ok_or(AmountError::OutOfRange)
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, SCALE)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
