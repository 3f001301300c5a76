//! Aggregation: deduplicate raw scanner records, total them and resolve the
//! billing period.

use chrono::NaiveDate;
use fatura_core::{Amount, BillingPeriod, CardTotal, Locale, StatementResult, TransactionRecord};
use log::debug;
use std::collections::{BTreeMap, HashSet};

/// Drop repeated (date, description, amount, card) tuples; first occurrence wins.
///
/// The same physical line can be rebuilt twice from overlapping fragment
/// groups near column or page boundaries.
pub fn dedup_records(records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    let mut seen: HashSet<(String, String, Amount, String)> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| {
            seen.insert((
                r.date.clone(),
                r.description.clone(),
                r.amount,
                r.card.clone(),
            ))
        })
        .collect()
}

/// Count and total per card label.
pub fn card_totals(records: &[TransactionRecord]) -> BTreeMap<String, CardTotal> {
    let mut by_card: BTreeMap<String, CardTotal> = BTreeMap::new();
    for r in records {
        let entry = by_card.entry(r.card.clone()).or_default();
        entry.count += 1;
        entry.total += r.amount;
    }
    by_card
}

/// Build the final statement from raw records and the due date (if any).
///
/// `today` is only used for the billing period when no due date was found.
pub fn aggregate(
    records: Vec<TransactionRecord>,
    due_date: Option<String>,
    locale: Locale,
    today: NaiveDate,
) -> StatementResult {
    let raw_count = records.len();
    let transactions = dedup_records(records);
    if transactions.len() < raw_count {
        debug!("dropped {} duplicate records", raw_count - transactions.len());
    }

    let total: Amount = transactions.iter().map(|t| t.amount).sum();
    let by_card = card_totals(&transactions);
    let period = BillingPeriod::resolve(due_date.as_deref(), today, locale);

    StatementResult {
        month: period.key,
        month_label: period.label,
        due_date,
        total,
        by_card,
        transactions,
    }
}
