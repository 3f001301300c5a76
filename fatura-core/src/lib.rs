//! fatura-core: domain types for credit-card statement extraction

pub mod amount;
pub mod billing;
pub mod holders;
pub mod record;
pub mod statement;

pub use amount::Amount;
pub use billing::{BillingPeriod, Locale, parse_due_date};
pub use holders::{HolderAllowList, HolderRule};
pub use record::{Section, TransactionRecord, card_label};
pub use statement::{CardTotal, StatementResult};
