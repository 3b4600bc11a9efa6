use crate::models::Currency;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary value in minor units of its currency.
///
/// Amounts are plain integers (cents, pence, yen); the ledger performs exact
/// integer arithmetic and never rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
