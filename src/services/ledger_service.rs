use crate::error::{AppError, Result};
use crate::idempotency::{IdempotencyKey, IdempotencyStatus, IdempotencyStore};
use crate::ledger::{AccountRegistry, CustomerLedger};
use crate::models::{BalanceSnapshot, CreditType, Currency, DebitLineItem};
use crate::observability::{get_metrics, LatencyTimer};
use anyhow::anyhow;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A credit grant to apply to a customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditRequest {
    pub credit_type: CreditType,
    pub amount: i64,
    pub currency: Currency,
    pub transaction_id: String,
}

impl CreditRequest {
    pub fn new(
        credit_type: CreditType,
        amount: i64,
        currency: Currency,
        transaction_id: impl Into<String>,
    ) -> Self {
        Self {
            credit_type,
            amount,
            currency,
            transaction_id: transaction_id.into(),
        }
    }
}

/// A charge to draw down from a customer's available credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebitRequest {
    pub invoice_id: String,
    pub amount: i64,
    pub currency: Currency,
}

impl DebitRequest {
    pub fn new(invoice_id: impl Into<String>, amount: i64, currency: Currency) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            amount,
            currency,
        }
    }
}

/// Facade over the ledger engine and the only entry point collaborators use.
///
/// Every operation resolves the customer's slot and takes the right lock
/// mode. Writes run the idempotency admission inside the write lock so that
/// two concurrent identical requests cannot both be admitted.
#[derive(Debug, Default)]
pub struct LedgerService {
    registry: AccountRegistry,
    idempotency: IdempotencyStore,
}

impl LedgerService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    pub fn idempotency(&self) -> &IdempotencyStore {
        &self.idempotency
    }

    /// Applies a credit grant and returns the resulting balance snapshot.
    /// A retried (customer, credit type, transaction id) is a no-op that
    /// returns the current snapshot.
    pub async fn process_credit(
        &self,
        customer_id: &str,
        request: CreditRequest,
    ) -> Result<BalanceSnapshot> {
        if request.amount <= 0 {
            return Err(AppError::Validation("Credit amount must be positive".to_string()));
        }

        let timer = LatencyTimer::new();
        let key =
            IdempotencyKey::credit(customer_id, request.credit_type, request.transaction_id.as_str());
        let raw = serde_json::to_value(&request)
            .map_err(|e| AppError::Internal(anyhow!("Failed to serialize credit request: {e}")))?;

        let slot = self.registry.slot_or_create(customer_id);
        let mut guard = slot.write().await;

        if !self.idempotency.admit(key.clone(), raw) {
            tracing::info!(%key, "Ignoring duplicate credit request");
            get_metrics().record_duplicate_request("credit");
            return Ok(guard.as_ref().map(CustomerLedger::snapshot).unwrap_or_default());
        }

        let ledger = guard.get_or_insert_with(|| CustomerLedger::new(customer_id));
        ledger.currency_or_create(request.currency).apply_credit(
            request.credit_type,
            request.amount,
            request.transaction_id.as_str(),
            Utc::now(),
        );
        self.idempotency.record_outcome(&key, IdempotencyStatus::Success);

        tracing::info!(
            customer_id,
            credit_type = %request.credit_type,
            amount = request.amount,
            currency = %request.currency,
            "Applied credit"
        );
        get_metrics().record_credit_applied(request.credit_type.as_str(), request.currency.as_str());
        get_metrics().record_ledger_write_latency(timer.elapsed_ms());
        get_metrics().set_tracked_accounts(self.registry.slot_count() as i64);

        Ok(ledger.snapshot())
    }

    /// Draws a debit down from available credit, highest priority first.
    /// Fails with `InsufficientCredit` and leaves the ledger untouched when
    /// the customer cannot cover the amount; a retried (customer, invoice)
    /// is a no-op returning the current snapshot.
    pub async fn process_debit(
        &self,
        customer_id: &str,
        request: DebitRequest,
    ) -> Result<BalanceSnapshot> {
        if request.amount <= 0 {
            return Err(AppError::Validation("Debit amount must be positive".to_string()));
        }

        let timer = LatencyTimer::new();
        let key = IdempotencyKey::debit(customer_id, request.invoice_id.as_str());
        let raw = serde_json::to_value(&request)
            .map_err(|e| AppError::Internal(anyhow!("Failed to serialize debit request: {e}")))?;

        let slot = self.registry.slot_or_create(customer_id);
        let mut guard = slot.write().await;

        if !self.idempotency.admit(key.clone(), raw) {
            tracing::info!(%key, "Ignoring duplicate debit request");
            get_metrics().record_duplicate_request("debit");
            return Ok(guard.as_ref().map(CustomerLedger::snapshot).unwrap_or_default());
        }

        let currency_ledger = guard
            .as_mut()
            .and_then(|ledger| ledger.currency_mut(request.currency));
        let outcome = match currency_ledger {
            Some(ledger) => ledger.apply_debit(request.amount, &request.invoice_id, Utc::now()),
            // Nothing was ever credited in this currency; a failed debit
            // must not open an empty ledger either.
            None => Err(AppError::InsufficientCredit {
                requested: request.amount,
                available: 0,
                currency: request.currency,
            }),
        };

        match outcome {
            Ok(records) => {
                self.idempotency.record_outcome(&key, IdempotencyStatus::Success);
                tracing::info!(
                    customer_id,
                    invoice_id = %request.invoice_id,
                    amount = request.amount,
                    currency = %request.currency,
                    entries_consumed = records.len(),
                    "Applied debit"
                );
                get_metrics().record_debit_applied(request.currency.as_str(), records.len() as u64);
                get_metrics().record_ledger_write_latency(timer.elapsed_ms());

                Ok(guard.as_ref().map(CustomerLedger::snapshot).unwrap_or_default())
            }
            Err(err) => {
                self.idempotency.record_outcome(&key, IdempotencyStatus::Failure);
                tracing::warn!(
                    customer_id,
                    invoice_id = %request.invoice_id,
                    amount = request.amount,
                    currency = %request.currency,
                    %err,
                    "Rejected debit"
                );
                get_metrics().record_debit_rejected(request.currency.as_str());
                Err(err)
            }
        }
    }

    /// Current balance snapshot; empty for unknown customers.
    pub async fn get_balance(&self, customer_id: &str) -> BalanceSnapshot {
        let timer = LatencyTimer::new();
        let snapshot = match self.registry.slot(customer_id) {
            Some(slot) => {
                let guard = slot.read().await;
                guard.as_ref().map(CustomerLedger::snapshot).unwrap_or_default()
            }
            None => BalanceSnapshot::empty(),
        };
        get_metrics().record_balance_query_latency(timer.elapsed_ms());
        snapshot
    }

    /// Debit history across the customer's currencies; empty for unknown
    /// customers. Within a currency the order is append order; across
    /// currencies it is the first-credited order of the ledgers.
    pub async fn debit_history(&self, customer_id: &str) -> Vec<DebitLineItem> {
        match self.registry.slot(customer_id) {
            Some(slot) => {
                let guard = slot.read().await;
                guard.as_ref().map(CustomerLedger::debit_history).unwrap_or_default()
            }
            None => Vec::new(),
        }
    }

    /// Removes the customer's ledger and returns its final snapshot, or
    /// `None` if the customer was never known. The account slot (and its
    /// lock) stays in the arena.
    pub async fn delete_account(&self, customer_id: &str) -> Option<BalanceSnapshot> {
        let slot = self.registry.slot(customer_id)?;
        let mut guard = slot.write().await;
        let ledger = guard.take()?;
        tracing::info!(customer_id, "Deleted customer account");
        Some(ledger.snapshot())
    }
}
