//! fatura-ingest: fragment sources, two-column layout reconstruction and the
//! statement line scanner.

pub mod error;
pub mod layout;
pub mod parsers;
pub mod source;
pub mod types;

pub use error::{ConfigError, SourceError};
pub use layout::{LayoutConfig, layout_lines, reconstruct_lines, sequence_lines};
pub use parsers::{ScanConfig, ScanOutput, ScanRules, scan_lines};
pub use source::{CsvFragmentSource, DumpFormat, FragmentSource, JsonFragmentSource, open_source};
pub use types::{Column, ReconstructedLine, TextFragment};
