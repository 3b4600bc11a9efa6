use crate::idempotency::IdempotencyKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lifecycle of an admitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IdempotencyStatus {
    Received,
    Success,
    Failure,
}

/// Audit record for one admitted request. Stores the raw request body and
/// its hash so a replayed key can be checked against what was originally
/// sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    pub key: IdempotencyKey,
    pub status: IdempotencyStatus,
    pub raw_request: serde_json::Value,
    pub request_hash: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl IdempotencyRecord {
    pub fn new(key: IdempotencyKey, raw_request: serde_json::Value) -> Self {
        let request_hash = hash_request(&raw_request);
        Self {
            key,
            status: IdempotencyStatus::Received,
            raw_request,
            request_hash,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == IdempotencyStatus::Failure
    }
}

/// SHA-256 hex digest of a request body.
pub fn hash_request<T: Serialize>(request: &T) -> String {
    let json = serde_json::to_string(request).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    hex::encode(hasher.finalize())
}

/// In-memory registry of every transaction key ever accepted.
///
/// Records live for the process lifetime; bounding growth is explicitly out
/// of scope. The store is shared by all customers, but `admit` is only
/// called while holding the relevant customer's write lock, which is what
/// makes admit-then-mutate race-free per customer.
#[derive(Debug, Default)]
pub struct IdempotencyStore {
    records: Mutex<HashMap<IdempotencyKey, IdempotencyRecord>>,
}

impl IdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<IdempotencyKey, IdempotencyRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomic insert-if-absent of a `Received` record. Returns `true` only
    /// when the caller should process the request.
    ///
    /// A key whose previous attempt ended in `Failure` is re-admitted with a
    /// fresh record: a debit rejected for insufficient credit must stay
    /// retryable once more credit arrives.
    pub fn admit(&self, key: IdempotencyKey, raw_request: serde_json::Value) -> bool {
        let mut records = self.records();
        match records.get(&key) {
            Some(existing) if !existing.is_failure() => false,
            _ => {
                records.insert(key.clone(), IdempotencyRecord::new(key, raw_request));
                true
            }
        }
    }

    /// Records the outcome of a previously admitted request.
    pub fn record_outcome(&self, key: &IdempotencyKey, status: IdempotencyStatus) {
        if let Some(record) = self.records().get_mut(key) {
            record.status = status;
            record.completed_at = Some(Utc::now());
        }
    }

    /// Fetches a record for audit.
    pub fn lookup(&self, key: &IdempotencyKey) -> Option<IdempotencyRecord> {
        self.records().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}
