use crate::ledger::CustomerLedger;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One customer's slot in the registry: the read-write lock together with
/// the ledger it guards.
///
/// `None` means the customer is unknown (never credited, or deleted). The
/// slot itself lives for the process lifetime once created; deleting an
/// account clears the option but keeps the lock, so an in-flight waiter
/// never sees its lock vanish.
#[derive(Debug, Default)]
pub struct AccountSlot {
    ledger: RwLock<Option<CustomerLedger>>,
}

impl AccountSlot {
    /// Shared access for balance and history reads. Concurrent readers are
    /// fine; a writer excludes them all.
    pub async fn read(&self) -> RwLockReadGuard<'_, Option<CustomerLedger>> {
        self.ledger.read().await
    }

    /// Exclusive access for credits, debits and deletes. Dropping the
    /// returned future before it resolves abandons the wait with no side
    /// effects.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Option<CustomerLedger>> {
        self.ledger.write().await
    }
}

/// Lock arena and ledger registry keyed by customer id.
///
/// The map itself is guarded by a plain mutex held only for lookup and
/// insert; all ledger work happens under the per-slot async lock. Different
/// customers never contend with each other.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    slots: Mutex<HashMap<String, Arc<AccountSlot>>>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Arc<AccountSlot>>> {
        // A poisoned guard still holds a usable map.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Slot for an existing customer; `None` if no request ever touched
    /// this id. Read paths use this so lookups never allocate slots.
    pub fn slot(&self, customer_id: &str) -> Option<Arc<AccountSlot>> {
        self.slots().get(customer_id).cloned()
    }

    /// Atomic get-or-insert of the customer's slot. Two racing writers for
    /// a new customer end up sharing the same slot.
    pub fn slot_or_create(&self, customer_id: &str) -> Arc<AccountSlot> {
        Arc::clone(
            self.slots()
                .entry(customer_id.to_string())
                .or_insert_with(|| {
                    tracing::debug!(customer_id, "Creating account slot");
                    Arc::new(AccountSlot::default())
                }),
        )
    }

    /// Number of slots ever created (locks persist across deletes).
    pub fn slot_count(&self) -> usize {
        self.slots().len()
    }
}
