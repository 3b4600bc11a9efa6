use crate::models::{CreditType, Currency};
use serde::{Deserialize, Serialize};

/// Wire representation of a monetary amount. The currency arrives as a raw
/// string so that an unknown code surfaces as a validation error instead of
/// a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyBody {
    pub amount: i64,
    pub currency: String,
}

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Request body for applying a credit to a customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditBody {
    pub credit_type: CreditType,
    pub transaction_id: String,
    pub money: MoneyBody,
}

impl CreditBody {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.transaction_id.trim().is_empty() {
            errors.push(ValidationError::new("transaction_id", "transaction_id cannot be empty"));
        }
        if self.money.amount <= 0 {
            errors.push(ValidationError::new("money.amount", "amount must be positive"));
        }
        if self.money.currency.parse::<Currency>().is_err() {
            errors.push(ValidationError::new("money.currency", "unknown currency code"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Request body for charging a debit against a customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebitBody {
    pub invoice_id: String,
    pub money: MoneyBody,
}

impl DebitBody {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.invoice_id.trim().is_empty() {
            errors.push(ValidationError::new("invoice_id", "invoice_id cannot be empty"));
        }
        if self.money.amount <= 0 {
            errors.push(ValidationError::new("money.amount", "amount must be positive"));
        }
        if self.money.currency.parse::<Currency>().is_err() {
            errors.push(ValidationError::new("money.currency", "unknown currency code"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
