pub mod balance_snapshot;
pub mod credit_entry;
pub mod credit_type;
pub mod currency;
pub mod debit_record;
pub mod money;

pub use balance_snapshot::BalanceSnapshot;
pub use credit_entry::CreditEntry;
pub use credit_type::CreditType;
pub use currency::Currency;
pub use debit_record::{DebitLineItem, DebitRecord};
pub use money::Money;
