pub mod currency_ledger;
pub mod customer_ledger;
pub mod registry;

pub use currency_ledger::CurrencyLedger;
pub use customer_ledger::CustomerLedger;
pub use registry::{AccountRegistry, AccountSlot};
