//! Aggregated statement output

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::amount::Amount;
use crate::record::TransactionRecord;

/// Per-card subtotal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CardTotal {
    pub count: usize,
    pub total: Amount,
}

/// Everything recovered from one statement document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementResult {
    /// Billing period key (`YYYY-MM`)
    pub month: String,
    /// Billing period display label (`Março/24`)
    pub month_label: String,
    /// Due date exactly as printed (`DD/MM/YYYY`), when the statement had one
    pub due_date: Option<String>,
    pub total: Amount,
    pub by_card: BTreeMap<String, CardTotal>,
    pub transactions: Vec<TransactionRecord>,
}

impl StatementResult {
    pub fn transactions_for_card<'a>(
        &'a self,
        card: &'a str,
    ) -> impl Iterator<Item = &'a TransactionRecord> + 'a {
        self.transactions.iter().filter(move |t| t.card == card)
    }

    pub fn total_for_owner(&self, owner: &str) -> Amount {
        self.transactions
            .iter()
            .filter(|t| t.owner == owner)
            .map(|t| t.amount)
            .sum()
    }
}
