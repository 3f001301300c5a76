//! End-to-end statement parsing: fragments -> lines -> records -> statement.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use fatura_core::{Locale, StatementResult};
use fatura_ingest::parsers::LineAudit;
use fatura_ingest::{
    FragmentSource, LayoutConfig, ReconstructedLine, ScanRules, TextFragment, layout_lines,
    scan_lines,
};
use log::info;

use crate::aggregator::aggregate;
use crate::config::ParserConfig;

/// A compiled parser, reusable across documents
#[derive(Debug, Clone)]
pub struct StatementParser {
    layout: LayoutConfig,
    rules: ScanRules,
    locale: Locale,
}

impl StatementParser {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        let rules = config.compile().context("invalid parser configuration")?;
        Ok(Self {
            layout: config.layout,
            rules,
            locale: config.locale,
        })
    }

    /// Sequenced lines, in reading order
    pub fn lines(&self, fragments: &[TextFragment]) -> Vec<ReconstructedLine> {
        layout_lines(fragments, &self.layout)
    }

    pub fn parse(&self, fragments: &[TextFragment]) -> StatementResult {
        self.parse_at(fragments, Local::now().date_naive())
    }

    /// Parse with an explicit processing date (used when the due date is missing).
    pub fn parse_at(&self, fragments: &[TextFragment], today: NaiveDate) -> StatementResult {
        self.parse_with_audit(fragments, today).0
    }

    /// Parse and also return the per-line classification trail.
    pub fn parse_with_audit(
        &self,
        fragments: &[TextFragment],
        today: NaiveDate,
    ) -> (StatementResult, Vec<LineAudit>) {
        let lines = self.lines(fragments);
        info!("{} fragments -> {} lines", fragments.len(), lines.len());

        let scan = scan_lines(&lines, &self.rules);
        let result = aggregate(scan.records, scan.due_date, self.locale, today);
        info!(
            "{} transactions, total {} ({})",
            result.transactions.len(),
            result.total,
            result.month_label
        );
        (result, scan.audit)
    }
}

/// Parse a fragment set with `config`.
pub fn parse_statement(fragments: &[TextFragment], config: &ParserConfig) -> Result<StatementResult> {
    Ok(StatementParser::new(config)?.parse(fragments))
}

/// Like [`parse_statement`] with a fixed processing date.
pub fn parse_statement_at(
    fragments: &[TextFragment],
    config: &ParserConfig,
    today: NaiveDate,
) -> Result<StatementResult> {
    Ok(StatementParser::new(config)?.parse_at(fragments, today))
}

/// Pull fragments from `source` and parse them. A source failure aborts the parse.
pub fn parse_source(source: &dyn FragmentSource, config: &ParserConfig) -> Result<StatementResult> {
    let parser = StatementParser::new(config)?;
    let fragments = source.fragments().context("decoding statement fragments")?;
    Ok(parser.parse(&fragments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatura_core::{Amount, Section};

    fn frag(page: u32, x: f64, y: f64, text: &str) -> TextFragment {
        TextFragment::new(page, x, y, text)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_fragments_to_statement() {
        let fragments = vec![
            frag(1, 40.0, 780.0, "Vencimento:"),
            frag(1, 110.0, 780.0, "10/04/2024"),
            frag(1, 40.0, 700.0, "RODRIGO S SILVA - 4258 XXXX XXXX 1234"),
            frag(1, 250.0, 690.0, "123,45"),
            frag(1, 40.0, 690.0, "15/03"),
            frag(1, 80.0, 690.5, "SUPERMARKET XYZ"),
            frag(1, 40.0, 670.0, "02/03 STORE ABC 01/06"),
            frag(1, 250.0, 670.0, "89,90"),
        ];
        let result = parse_statement_at(&fragments, &ParserConfig::default(), today()).unwrap();
        assert_eq!(result.transactions.len(), 2);
        assert_eq!(result.transactions[0].description, "SUPERMARKET XYZ");
        assert_eq!(result.transactions[0].category, Section::Cash);
        assert_eq!(result.transactions[1].description, "STORE ABC (01/06)");
        assert_eq!(result.transactions[1].category, Section::Installment);
        assert_eq!(result.total, Amount::from_cents(21335));
        assert_eq!(result.month, "2024-03");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut cfg = ParserConfig::default();
        cfg.scan.noise_patterns = vec!["[".into()];
        assert!(parse_statement(&[], &cfg).is_err());
    }

    #[test]
    fn test_source_failure_aborts() {
        let empty: Vec<TextFragment> = Vec::new();
        let err = parse_source(&empty, &ParserConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("no text fragments"));
    }
}
