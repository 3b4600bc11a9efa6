use crate::error::{AppError, Result};
use crate::models::{CreditEntry, CreditType, Currency, DebitRecord};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, VecDeque};

/// Per-(customer, currency) ledger: balances by credit type, the ordered
/// active-credit queue, and the append-only debit history.
///
/// All mutation happens under the owning customer's exclusive lock, so
/// methods take `&mut self` and never need internal synchronization.
/// Invariant: the sum of active entries per credit type equals
/// `balance_by_type[type]`, and no zero or negative balance persists.
#[derive(Debug)]
pub struct CurrencyLedger {
    customer_id: String,
    currency: Currency,
    balance_by_type: BTreeMap<CreditType, i64>,
    /// Ordered by (credit-type priority, applied_at), FIFO within ties.
    active_credits: VecDeque<CreditEntry>,
    history: Vec<DebitRecord>,
}

impl CurrencyLedger {
    pub fn new(customer_id: impl Into<String>, currency: Currency) -> Self {
        Self {
            customer_id: customer_id.into(),
            currency,
            balance_by_type: BTreeMap::new(),
            active_credits: VecDeque::new(),
            history: Vec::new(),
        }
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn balance_by_type(&self) -> &BTreeMap<CreditType, i64> {
        &self.balance_by_type
    }

    pub fn history(&self) -> &[DebitRecord] {
        &self.history
    }

    pub fn total_available(&self) -> i64 {
        self.balance_by_type.values().sum()
    }

    /// Inserts a credit grant into the active queue and bumps the balance.
    ///
    /// The insertion point keeps the queue sorted by (priority, applied_at)
    /// and lands after entries with an equal key, so same-instant grants
    /// drain in arrival order. Duplicate filtering happens upstream in the
    /// facade.
    pub fn apply_credit(
        &mut self,
        credit_type: CreditType,
        amount: i64,
        transaction_id: impl Into<String>,
        applied_at: DateTime<Utc>,
    ) {
        let entry = CreditEntry::new(credit_type, amount, self.currency, transaction_id, applied_at);

        let idx = self
            .active_credits
            .partition_point(|e| e.sort_key() <= entry.sort_key());
        self.active_credits.insert(idx, entry);

        self.update_balance(credit_type, amount);
    }

    /// Consumes credit to satisfy a debit, highest-priority/oldest first.
    ///
    /// Runs in two phases: a plan pass that walks the queue without touching
    /// it, then a commit pass that applies the plan. A debit that cannot be
    /// satisfied fails during planning, before any mutation, so the ledger
    /// is either fully updated or untouched.
    ///
    /// Returns one `DebitRecord` per credit entry consumed, in consumption
    /// order; the same records are appended to the history.
    pub fn apply_debit(
        &mut self,
        amount: i64,
        invoice_id: &str,
        applied_at: DateTime<Utc>,
    ) -> Result<Vec<DebitRecord>> {
        let available = self.total_available();
        if available < amount {
            return Err(AppError::InsufficientCredit {
                requested: amount,
                available,
                currency: self.currency,
            });
        }

        // Plan: per-entry consumption amounts, front to back.
        let mut outstanding = amount;
        let mut plan = Vec::new();
        for entry in &self.active_credits {
            if outstanding == 0 {
                break;
            }
            let consumed = entry.amount.min(outstanding);
            plan.push(consumed);
            outstanding -= consumed;
        }
        // Unreachable once the guard above passed: the exclusive lock rules
        // out a queue/balance mismatch. Kept as a safety net.
        if outstanding > 0 {
            return Err(AppError::InsufficientCredit {
                requested: amount,
                available,
                currency: self.currency,
            });
        }

        // Commit: mutate the head in place or pop it, emitting one record
        // per consumed entry.
        let mut records = Vec::with_capacity(plan.len());
        for consumed in plan {
            let Some(entry) = self.active_credits.front_mut() else {
                break;
            };
            records.push(DebitRecord::new(
                invoice_id,
                consumed,
                entry.credit_type,
                entry.transaction_id.clone(),
                applied_at,
            ));
            if consumed == entry.amount {
                self.active_credits.pop_front();
            } else {
                entry.amount -= consumed;
            }
        }

        for record in &records {
            self.update_balance(record.credit_type, -record.amount);
        }
        self.history.extend(records.iter().cloned());

        Ok(records)
    }

    /// Adjusts the per-type balance, dropping the entry when it hits zero.
    fn update_balance(&mut self, credit_type: CreditType, delta: i64) {
        let balance = self.balance_by_type.get(&credit_type).copied().unwrap_or(0) + delta;
        if balance == 0 {
            self.balance_by_type.remove(&credit_type);
        } else {
            self.balance_by_type.insert(credit_type, balance);
        }
    }

    #[cfg(test)]
    pub(crate) fn active_credits(&self) -> &VecDeque<CreditEntry> {
        &self.active_credits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ts(offset_secs: i64) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
            + Duration::seconds(offset_secs)
    }

    fn ledger() -> CurrencyLedger {
        CurrencyLedger::new("cust-1", Currency::USD)
    }

    #[test]
    fn test_credit_accumulates_balance_by_type() {
        let mut ledger = ledger();
        ledger.apply_credit(CreditType::GiftCard, 15, "t1", ts(0));
        ledger.apply_credit(CreditType::Cash, 10, "t2", ts(1));
        ledger.apply_credit(CreditType::GiftCard, 10, "t3", ts(2));

        assert_eq!(ledger.balance_by_type().get(&CreditType::GiftCard), Some(&25));
        assert_eq!(ledger.balance_by_type().get(&CreditType::Cash), Some(&10));
        assert_eq!(ledger.total_available(), 35);
    }

    #[test]
    fn test_queue_orders_priority_before_recency() {
        let mut ledger = ledger();
        ledger.apply_credit(CreditType::Cash, 10, "t1", ts(0));
        ledger.apply_credit(CreditType::GiftCard, 15, "t2", ts(1));

        // The later gift card sits ahead of the earlier cash credit.
        let ids: Vec<_> = ledger
            .active_credits()
            .iter()
            .map(|e| e.transaction_id.as_str())
            .collect();
        assert_eq!(ids, vec!["t2", "t1"]);
    }

    #[test]
    fn test_queue_is_fifo_within_a_type() {
        let mut ledger = ledger();
        // Equal timestamps: arrival order must win.
        ledger.apply_credit(CreditType::Cash, 10, "t1", ts(0));
        ledger.apply_credit(CreditType::Cash, 20, "t2", ts(0));
        ledger.apply_credit(CreditType::Cash, 30, "t3", ts(0));

        let ids: Vec<_> = ledger
            .active_credits()
            .iter()
            .map(|e| e.transaction_id.as_str())
            .collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn test_debit_drains_lower_priority_type_first() {
        let mut ledger = ledger();
        ledger.apply_credit(CreditType::Cash, 50, "t1", ts(0));
        ledger.apply_credit(CreditType::GiftCard, 20, "t2", ts(1));

        let records = ledger.apply_debit(30, "i1", ts(2)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].credit_type, CreditType::GiftCard);
        assert_eq!(records[0].amount, 20);
        assert_eq!(records[1].credit_type, CreditType::Cash);
        assert_eq!(records[1].amount, 10);
        assert_eq!(ledger.balance_by_type().get(&CreditType::Cash), Some(&40));
        assert!(!ledger.balance_by_type().contains_key(&CreditType::GiftCard));
    }

    #[test]
    fn test_debit_splits_across_entries_in_consumption_order() {
        let mut ledger = ledger();
        ledger.apply_credit(CreditType::GiftCard, 15, "t1", ts(0));
        ledger.apply_credit(CreditType::GiftCard, 10, "t2", ts(1));

        let records = ledger.apply_debit(20, "i1", ts(2)).unwrap();

        let slices: Vec<_> = records
            .iter()
            .map(|r| (r.transaction_id.as_str(), r.amount))
            .collect();
        assert_eq!(slices, vec![("t1", 15), ("t2", 5)]);
        assert_eq!(records.iter().map(|r| r.amount).sum::<i64>(), 20);

        // t2 keeps its remainder at the head of the queue.
        assert_eq!(ledger.active_credits().len(), 1);
        assert_eq!(ledger.active_credits()[0].amount, 5);
        assert_eq!(ledger.balance_by_type().get(&CreditType::GiftCard), Some(&5));
    }

    #[test]
    fn test_partial_consume_decrements_head_in_place() {
        let mut ledger = ledger();
        ledger.apply_credit(CreditType::Cash, 100, "t1", ts(0));

        let records = ledger.apply_debit(30, "i1", ts(1)).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, 30);
        assert_eq!(ledger.active_credits()[0].amount, 70);
        assert_eq!(ledger.balance_by_type().get(&CreditType::Cash), Some(&70));
    }

    #[test]
    fn test_insufficient_credit_leaves_ledger_untouched() {
        let mut ledger = ledger();
        ledger.apply_credit(CreditType::GiftCard, 15, "t1", ts(0));
        ledger.apply_credit(CreditType::Cash, 10, "t2", ts(1));

        let err = ledger.apply_debit(100, "i1", ts(2)).unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientCredit {
                requested: 100,
                available: 25,
                currency: Currency::USD,
            }
        ));

        assert_eq!(ledger.total_available(), 25);
        assert_eq!(ledger.active_credits().len(), 2);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_exact_drain_removes_balance_entry() {
        let mut ledger = ledger();
        ledger.apply_credit(CreditType::Cash, 40, "t1", ts(0));

        ledger.apply_debit(40, "i1", ts(1)).unwrap();

        assert!(ledger.balance_by_type().is_empty());
        assert!(ledger.active_credits().is_empty());
        assert_eq!(ledger.total_available(), 0);
    }

    #[test]
    fn test_history_appends_in_consumption_order() {
        let mut ledger = ledger();
        ledger.apply_credit(CreditType::GiftCard, 15, "t1", ts(0));
        ledger.apply_credit(CreditType::Cash, 10, "t2", ts(1));
        ledger.apply_credit(CreditType::Cash, 17, "t3", ts(2));
        ledger.apply_credit(CreditType::GiftCard, 10, "t4", ts(3));

        ledger.apply_debit(25, "i1", ts(4)).unwrap();
        ledger.apply_debit(27, "i2", ts(5)).unwrap();

        let history: Vec<_> = ledger
            .history()
            .iter()
            .map(|r| (r.invoice_id.as_str(), r.amount, r.credit_type, r.transaction_id.as_str()))
            .collect();
        assert_eq!(
            history,
            vec![
                ("i1", 15, CreditType::GiftCard, "t1"),
                ("i1", 10, CreditType::GiftCard, "t4"),
                ("i2", 10, CreditType::Cash, "t2"),
                ("i2", 17, CreditType::Cash, "t3"),
            ]
        );
        assert!(ledger.balance_by_type().is_empty());
    }
}
