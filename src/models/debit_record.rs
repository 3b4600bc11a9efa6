use crate::models::{CreditType, Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One slice of a processed debit, attributed to the credit entry it
/// consumed. A debit that spans several credit entries produces one record
/// per entry, in consumption order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebitRecord {
    /// Receipt id for the charge; unique per customer.
    pub invoice_id: String,
    /// Amount taken from the source credit, in minor units.
    pub amount: i64,
    /// Credit type the slice was charged against.
    pub credit_type: CreditType,
    /// Transaction id of the credit grant the slice was charged against.
    pub transaction_id: String,
    pub applied_at: DateTime<Utc>,
}

impl DebitRecord {
    pub fn new(
        invoice_id: impl Into<String>,
        amount: i64,
        credit_type: CreditType,
        transaction_id: impl Into<String>,
        applied_at: DateTime<Utc>,
    ) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            amount,
            credit_type,
            transaction_id: transaction_id.into(),
            applied_at,
        }
    }
}

/// Read projection of a `DebitRecord` for history queries; carries the
/// currency of the ledger the record lives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebitLineItem {
    pub amount: Money,
    pub credit_type: CreditType,
    pub invoice_id: String,
    pub transaction_id: String,
    pub applied_at: DateTime<Utc>,
}

impl DebitLineItem {
    pub fn from_record(record: &DebitRecord, currency: Currency) -> Self {
        Self {
            amount: Money::new(record.amount, currency),
            credit_type: record.credit_type,
            invoice_id: record.invoice_id.clone(),
            transaction_id: record.transaction_id.clone(),
            applied_at: record.applied_at,
        }
    }
}
