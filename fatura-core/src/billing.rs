//! Billing period derivation.
//!
//! A statement's reference month is the month before its due date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Language used for month display labels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl Locale {
    /// Month name for 1-based `month`
    pub fn month_name(&self, month: u32) -> &'static str {
        const PT: [&str; 12] = [
            "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
            "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
        ];
        const EN: [&str; 12] = [
            "January", "February", "March", "April", "May", "June",
            "July", "August", "September", "October", "November", "December",
        ];
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            Locale::PtBr => PT[idx],
            Locale::En => EN[idx],
        }
    }

    /// Label used when the statement carries no due date
    pub fn unknown_label(&self) -> &'static str {
        match self {
            Locale::PtBr => "Mês Desconhecido",
            Locale::En => "Unknown month",
        }
    }
}

/// Reference month of a statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingPeriod {
    /// Sortable key, `YYYY-MM`
    pub key: String,
    /// Display label, e.g. `Março/24`
    pub label: String,
}

impl BillingPeriod {
    /// Period for a statement due on `due`: the previous calendar month.
    pub fn from_due_date(due: NaiveDate, locale: Locale) -> Self {
        let (year, month) = match due.month() {
            1 => (due.year() - 1, 12),
            m => (due.year(), m - 1),
        };
        Self {
            key: format!("{year:04}-{month:02}"),
            label: format!("{}/{:02}", locale.month_name(month), year.rem_euclid(100)),
        }
    }

    /// Period used when no due date was found: the processing month, unlabelled.
    pub fn fallback(today: NaiveDate, locale: Locale) -> Self {
        Self {
            key: format!("{:04}-{:02}", today.year(), today.month()),
            label: locale.unknown_label().to_string(),
        }
    }

    pub fn resolve(due_date: Option<&str>, today: NaiveDate, locale: Locale) -> Self {
        due_date
            .and_then(parse_due_date)
            .map(|due| Self::from_due_date(due, locale))
            .unwrap_or_else(|| Self::fallback(today, locale))
    }
}

/// Parse a printed due date (`DD/MM/YYYY`).
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}
