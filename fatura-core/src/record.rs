//! Transaction record types emitted by the statement scanner

use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// Statement section a purchase belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Section {
    /// Purchase split across billing periods
    #[serde(rename = "Parcelamento")]
    Installment,
    /// Regular (single payment) purchase
    #[default]
    #[serde(rename = "À Vista")]
    Cash,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::Installment => "Parcelamento",
            Section::Cash => "À Vista",
        }
    }
}

/// One purchase line recovered from the statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Purchase date as printed (`DD/MM`)
    pub date: String,
    /// Merchant description; installment index appended as `(NN/NN)`
    pub description: String,
    /// Always strictly positive
    pub amount: Amount,
    /// Card label, `<HOLDER> – <SUFFIX>`
    pub card: String,
    /// Display label of the card owner
    pub owner: String,
    pub category: Section,
}

impl TransactionRecord {
    /// Identity used for deduplication: (date, description, amount, card)
    pub fn dedup_key(&self) -> (&str, &str, Amount, &str) {
        (&self.date, &self.description, self.amount, &self.card)
    }

    pub fn is_installment(&self) -> bool {
        self.category == Section::Installment
    }
}

/// Card label as shown on records and totals
pub fn card_label(holder: &str, suffix: &str) -> String {
    format!("{holder} – {suffix}")
}
