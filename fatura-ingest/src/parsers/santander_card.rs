//! Santander credit card statement scanner.
//!
//! Walks the sequenced lines once, carrying the current card context from
//! header to header. Each line falls into exactly one category, tested in
//! this order:
//!
//!   card header > (no card yet) > section marker > noise > excluded holder
//!   > transaction > rejected
//!
//! The first valid due-date line is captured independently of the above.

use fatura_core::{Section, TransactionRecord};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::card_header::{CardContext, parse_card_header};
use super::rules::ScanRules;
use super::transaction::{Rejection, parse_transaction};
use crate::types::{Column, ReconstructedLine};

/// Category a line was classified into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LineKind {
    CardHeader { card: String, included: bool },
    /// Appeared before any card header
    NoCardContext,
    SectionMarker(Section),
    Noise,
    /// Current card's holder is not allow-listed
    ExcludedHolder,
    Transaction(TransactionRecord),
    Rejected(Rejection),
}

impl LineKind {
    pub fn label(&self) -> &'static str {
        match self {
            LineKind::CardHeader { .. } => "card_header",
            LineKind::NoCardContext => "no_card_context",
            LineKind::SectionMarker(_) => "section_marker",
            LineKind::Noise => "noise",
            LineKind::ExcludedHolder => "excluded_holder",
            LineKind::Transaction(_) => "transaction",
            LineKind::Rejected(_) => "rejected",
        }
    }
}

/// One line's classification, for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAudit {
    pub page: u32,
    pub column: Column,
    pub y: i64,
    pub text: String,
    pub outcome: LineKind,
}

/// Raw scanner output, before deduplication and totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanOutput {
    pub records: Vec<TransactionRecord>,
    /// First due date found (`DD/MM/YYYY`)
    pub due_date: Option<String>,
    pub audit: Vec<LineAudit>,
}

/// Classify one line given the current card context.
///
/// Returns the context to use for the next line alongside the classification.
pub fn classify_line(
    text: &str,
    context: Option<CardContext>,
    rules: &ScanRules,
) -> (Option<CardContext>, LineKind) {
    if let Some(header) = parse_card_header(text, rules) {
        let kind = LineKind::CardHeader {
            card: header.card_label(),
            included: header.include,
        };
        return (Some(header), kind);
    }

    let Some(mut ctx) = context else {
        return (None, LineKind::NoCardContext);
    };

    if let Some(section) = rules.section_marker(text) {
        ctx.section = section;
        return (Some(ctx), LineKind::SectionMarker(section));
    }

    if rules.is_noise(text) {
        return (Some(ctx), LineKind::Noise);
    }

    if !ctx.include {
        return (Some(ctx), LineKind::ExcludedHolder);
    }

    let kind = match parse_transaction(text) {
        Ok(tx) => LineKind::Transaction(TransactionRecord {
            date: tx.date,
            description: tx.description,
            amount: tx.amount,
            card: ctx.card_label(),
            owner: rules.allow_list().owner_label(&ctx.holder_name),
            category: if tx.installment {
                Section::Installment
            } else {
                ctx.section
            },
        }),
        Err(reason) => LineKind::Rejected(reason),
    };
    (Some(ctx), kind)
}

/// Scan sequenced lines into raw transaction records.
pub fn scan_lines(lines: &[ReconstructedLine], rules: &ScanRules) -> ScanOutput {
    let mut out = ScanOutput::default();
    let mut context: Option<CardContext> = None;

    for line in lines {
        if out.due_date.is_none() {
            if let Some(due) = rules.due_date(&line.text) {
                info!("due date {} (page {}, {:?} column)", due, line.page, line.column);
                out.due_date = Some(due);
            }
        }

        let (next, kind) = classify_line(&line.text, context.take(), rules);
        context = next;

        match &kind {
            LineKind::CardHeader { card, included } => {
                let status = if *included { "included" } else { "skipped" };
                info!(
                    "card {} {} (page {}, {:?} column, y={})",
                    card, status, line.page, line.column, line.y
                );
            }
            LineKind::Transaction(record) => {
                trace!("{} {} {} [{}]", record.date, record.description, record.amount, record.card);
                out.records.push(record.clone());
            }
            LineKind::Rejected(reason) => {
                debug!("rejected '{}': {}", line.text, reason);
            }
            _ => {}
        }

        out.audit.push(LineAudit {
            page: line.page,
            column: line.column,
            y: line.y,
            text: line.text.clone(),
            outcome: kind,
        });
    }

    debug!("scanned {} lines, {} raw records", lines.len(), out.records.len());
    out
}
