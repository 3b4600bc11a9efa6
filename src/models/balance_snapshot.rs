use crate::models::{CreditType, Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time, read-only view of a customer's available credit.
///
/// One `Money` per currency with a nonzero balance for the credit type,
/// currencies in the order they were first credited. Rebuilt fresh on every
/// read under the account's read lock, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub balances: BTreeMap<CreditType, Vec<Money>>,
}

impl BalanceSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Balance for one (credit type, currency) bucket, if present.
    pub fn amount_for(&self, credit_type: CreditType, currency: Currency) -> Option<i64> {
        self.balances
            .get(&credit_type)?
            .iter()
            .find(|m| m.currency == currency)
            .map(|m| m.amount)
    }

    /// Total available across all credit types for one currency.
    pub fn total_for(&self, currency: Currency) -> i64 {
        self.balances
            .values()
            .flatten()
            .filter(|m| m.currency == currency)
            .map(|m| m.amount)
            .sum()
    }

    pub(crate) fn push(&mut self, credit_type: CreditType, money: Money) {
        self.balances.entry(credit_type).or_default().push(money);
    }
}
