//! fatura-finance: aggregation of scanned statement records and the
//! end-to-end parsing pipeline.

pub mod aggregator;
pub mod config;
pub mod pipeline;

pub use aggregator::{aggregate, card_totals, dedup_records};
pub use config::ParserConfig;
pub use pipeline::{StatementParser, parse_source, parse_statement, parse_statement_at};
