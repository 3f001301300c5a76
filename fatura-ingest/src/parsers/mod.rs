pub mod card_header;
pub mod rules;
pub mod santander_card;
pub mod transaction;

pub use card_header::{CardContext, parse_card_header};
pub use rules::{ScanConfig, ScanRules};
pub use santander_card::{LineAudit, LineKind, ScanOutput, classify_line, scan_lines};
pub use transaction::{ParsedTransaction, Rejection, parse_transaction};
