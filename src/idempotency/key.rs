use crate::models::CreditType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a request credits or debits an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// Deterministic identity of a request, used to recognize retries.
///
/// Credits are keyed by (customer, credit type, transaction id); debits by
/// (customer, invoice id). The tagged enum makes the two key shapes
/// structurally distinct, so a crafted invoice id can never collide with a
/// credit key the way concatenated strings could.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdempotencyKey {
    Credit {
        customer_id: String,
        credit_type: CreditType,
        transaction_id: String,
    },
    Debit {
        customer_id: String,
        invoice_id: String,
    },
}

impl IdempotencyKey {
    pub fn credit(
        customer_id: impl Into<String>,
        credit_type: CreditType,
        transaction_id: impl Into<String>,
    ) -> Self {
        Self::Credit {
            customer_id: customer_id.into(),
            credit_type,
            transaction_id: transaction_id.into(),
        }
    }

    pub fn debit(customer_id: impl Into<String>, invoice_id: impl Into<String>) -> Self {
        Self::Debit {
            customer_id: customer_id.into(),
            invoice_id: invoice_id.into(),
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            IdempotencyKey::Credit { .. } => TransactionKind::Credit,
            IdempotencyKey::Debit { .. } => TransactionKind::Debit,
        }
    }

    pub fn customer_id(&self) -> &str {
        match self {
            IdempotencyKey::Credit { customer_id, .. } => customer_id,
            IdempotencyKey::Debit { customer_id, .. } => customer_id,
        }
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdempotencyKey::Credit {
                customer_id,
                credit_type,
                transaction_id,
            } => write!(f, "credit:{customer_id}:{credit_type}:{transaction_id}"),
            IdempotencyKey::Debit {
                customer_id,
                invoice_id,
            } => write!(f, "debit:{customer_id}:{invoice_id}"),
        }
    }
}
