pub mod ledger_service;

pub use ledger_service::{CreditRequest, DebitRequest, LedgerService};
