use crate::models::{BalanceSnapshot, CreditType, DebitLineItem, Money};
use crate::observability::EngineHealth;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Successful response with no payload (e.g. deleting an unknown
    /// customer, which is not an error).
    pub fn success_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn error(error: ErrorResponse) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<ValidationErrorDetail>) -> Self {
        self.details = Some(details);
        self
    }
}

/// Validation error detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

/// Balance response DTO: credit type → per-currency amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub customer_id: String,
    pub balances: BTreeMap<CreditType, Vec<Money>>,
}

impl BalanceResponse {
    pub fn from_snapshot(customer_id: impl Into<String>, snapshot: BalanceSnapshot) -> Self {
        Self {
            customer_id: customer_id.into(),
            balances: snapshot.balances,
        }
    }
}

/// Debit history response DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebitHistoryResponse {
    pub customer_id: String,
    pub debits: Vec<DebitLineItem>,
}

impl DebitHistoryResponse {
    pub fn new(customer_id: impl Into<String>, debits: Vec<DebitLineItem>) -> Self {
        Self {
            customer_id: customer_id.into(),
            debits,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub tracked_accounts: usize,
}

impl From<EngineHealth> for HealthResponse {
    fn from(health: EngineHealth) -> Self {
        Self {
            status: if health.status.is_healthy() {
                "healthy".to_string()
            } else {
                "unhealthy".to_string()
            },
            version: health.version,
            uptime_seconds: health.uptime_seconds,
            tracked_accounts: health.tracked_accounts,
        }
    }
}
