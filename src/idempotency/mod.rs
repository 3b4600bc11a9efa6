pub mod key;
pub mod store;

pub use key::{IdempotencyKey, TransactionKind};
pub use store::{hash_request, IdempotencyRecord, IdempotencyStatus, IdempotencyStore};
