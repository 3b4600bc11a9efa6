use crate::models::{CreditType, Currency};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A credit grant sitting in a customer's active queue.
///
/// `amount` is the remaining value and shrinks in place as debits consume
/// the entry; the entry leaves the queue when it reaches zero. The original
/// grant is still visible afterwards through the debit history, which
/// records the source `transaction_id` of every consumed slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditEntry {
    pub credit_type: CreditType,
    pub amount: i64,
    pub currency: Currency,
    pub transaction_id: String,
    pub applied_at: DateTime<Utc>,
}

impl CreditEntry {
    pub fn new(
        credit_type: CreditType,
        amount: i64,
        currency: Currency,
        transaction_id: impl Into<String>,
        applied_at: DateTime<Utc>,
    ) -> Self {
        Self {
            credit_type,
            amount,
            currency,
            transaction_id: transaction_id.into(),
            applied_at,
        }
    }

    /// Queue position: credit-type priority first, then application time.
    pub fn sort_key(&self) -> (CreditType, DateTime<Utc>) {
        (self.credit_type, self.applied_at)
    }

    pub fn is_exhausted(&self) -> bool {
        self.amount == 0
    }
}
