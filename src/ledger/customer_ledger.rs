use crate::ledger::CurrencyLedger;
use crate::models::{BalanceSnapshot, Currency, DebitLineItem, Money};

/// All of one customer's currency ledgers.
///
/// Ledgers are kept in the order their currency was first credited; that
/// order is what makes snapshots and cross-currency history concatenation
/// stable within a process run. Lookup is a linear scan; a customer touches
/// a handful of currencies at most.
#[derive(Debug)]
pub struct CustomerLedger {
    customer_id: String,
    currencies: Vec<CurrencyLedger>,
}

impl CustomerLedger {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            currencies: Vec::new(),
        }
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn currency(&self, currency: Currency) -> Option<&CurrencyLedger> {
        self.currencies.iter().find(|l| l.currency() == currency)
    }

    /// Mutable ledger for a currency that has already been opened. Debits
    /// use this: a currency nobody ever credited has nothing to draw from,
    /// and a failed debit must not leave an empty ledger behind.
    pub fn currency_mut(&mut self, currency: Currency) -> Option<&mut CurrencyLedger> {
        self.currencies.iter_mut().find(|l| l.currency() == currency)
    }

    /// Returns the ledger for `currency`, creating it on first use.
    pub fn currency_or_create(&mut self, currency: Currency) -> &mut CurrencyLedger {
        let idx = match self.currencies.iter().position(|l| l.currency() == currency) {
            Some(idx) => idx,
            None => {
                tracing::debug!(
                    customer_id = %self.customer_id,
                    %currency,
                    "Opening currency ledger"
                );
                self.currencies
                    .push(CurrencyLedger::new(self.customer_id.clone(), currency));
                self.currencies.len() - 1
            }
        };
        &mut self.currencies[idx]
    }

    /// Rebuilds the balance projection: credit type → one `Money` per
    /// currency with a nonzero balance, currencies in first-credited order.
    pub fn snapshot(&self) -> BalanceSnapshot {
        let mut snapshot = BalanceSnapshot::empty();
        for ledger in &self.currencies {
            for (&credit_type, &amount) in ledger.balance_by_type() {
                snapshot.push(credit_type, Money::new(amount, ledger.currency()));
            }
        }
        snapshot
    }

    /// Debit history across all currencies: append order within a currency,
    /// first-credited order across currencies.
    pub fn debit_history(&self) -> Vec<DebitLineItem> {
        self.currencies
            .iter()
            .flat_map(|ledger| {
                ledger
                    .history()
                    .iter()
                    .map(|record| DebitLineItem::from_record(record, ledger.currency()))
            })
            .collect()
    }
}
