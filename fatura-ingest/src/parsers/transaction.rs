//! Transaction lines.
//!
//! Expected shapes after line reconstruction:
//!   15/03 SUPERMARKET XYZ 123,45
//!   02/03 STORE ABC 01/06 89,90
//!   3 20/03 @ POSTO SHELL 1.234,56 1.500,00
//!
//! A trailing `NN/NN` right before the amount is an installment index; a
//! second trailing amount is a running balance and is ignored.

use fatura_core::Amount;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Fields lifted from one transaction line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction {
    pub date: String,
    pub description: String,
    pub amount: Amount,
    /// Description carried an installment index
    pub installment: bool,
}

/// Why a candidate line did not produce a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    NoDate,
    NoAmount,
    NonPositiveAmount,
    DescriptionTooShort,
    NumericDescription,
    FractionDescription,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rejection::NoDate => "no DD/MM date",
            Rejection::NoAmount => "no trailing amount",
            Rejection::NonPositiveAmount => "amount is not positive",
            Rejection::DescriptionTooShort => "description shorter than 3 characters",
            Rejection::NumericDescription => "description is only digits/punctuation",
            Rejection::FractionDescription => "description is a bare fraction",
        };
        f.write_str(s)
    }
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{2}/\d{2}").expect("date regex"))
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(-?[\d.]+,\d{2})(?:\s+[\d.]+,\d{2})?$").expect("amount regex")
    })
}

fn installment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+(\d{2}/\d{2})$").expect("installment regex"))
}

fn leading_index_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\s+").expect("leading index regex"))
}

fn leading_punct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[@)\s]+").expect("leading punctuation regex"))
}

fn numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\d,.]+$").expect("numeric regex"))
}

fn fraction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+/\d+$").expect("fraction regex"))
}

/// Parse one reconstructed line as a purchase.
pub fn parse_transaction(text: &str) -> Result<ParsedTransaction, Rejection> {
    let date_match = date_re().find(text).ok_or(Rejection::NoDate)?;
    let date = date_match.as_str().to_string();
    let after_date = text[date_match.end()..].trim();

    let caps = amount_re().captures(after_date).ok_or(Rejection::NoAmount)?;
    let amount_match = caps.get(1).ok_or(Rejection::NoAmount)?;
    let amount = Amount::parse_br(amount_match.as_str()).ok_or(Rejection::NoAmount)?;
    if !amount.is_positive() {
        return Err(Rejection::NonPositiveAmount);
    }

    let mut description = after_date[..amount_match.start()].trim().to_string();

    let with_index = installment_re().captures(&description).and_then(|c| {
        let whole = c.get(0)?;
        let index = c.get(1)?;
        Some(format!("{} ({})", description[..whole.start()].trim(), index.as_str()))
    });
    let installment = with_index.is_some();
    if let Some(d) = with_index {
        description = d;
    }

    let description = clean_description(&description);
    validate_description(&description)?;

    Ok(ParsedTransaction {
        date,
        description,
        amount,
        installment,
    })
}

/// Drop a leading row index and stray leading `@`/`)` marks.
fn clean_description(desc: &str) -> String {
    let desc = leading_index_re().replace(desc, "");
    let desc = leading_punct_re().replace(&desc, "");
    desc.trim().to_string()
}

fn validate_description(desc: &str) -> Result<(), Rejection> {
    if desc.chars().count() < 3 {
        return Err(Rejection::DescriptionTooShort);
    }
    if numeric_re().is_match(desc) {
        return Err(Rejection::NumericDescription);
    }
    if fraction_re().is_match(desc) {
        return Err(Rejection::FractionDescription);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_purchase() {
        let tx = parse_transaction("15/03 SUPERMARKET XYZ 123,45").unwrap();
        assert_eq!(tx.date, "15/03");
        assert_eq!(tx.description, "SUPERMARKET XYZ");
        assert_eq!(tx.amount, Amount::from_cents(12345));
        assert!(!tx.installment);
    }

    #[test]
    fn test_installment_index_is_appended() {
        let tx = parse_transaction("02/03 STORE ABC 01/06 89,90").unwrap();
        assert_eq!(tx.description, "STORE ABC (01/06)");
        assert_eq!(tx.amount, Amount::from_cents(8990));
        assert!(tx.installment);
    }

    #[test]
    fn test_running_balance_is_ignored() {
        let tx = parse_transaction("20/03 POSTO SHELL 1.234,56 1.500,00").unwrap();
        assert_eq!(tx.description, "POSTO SHELL");
        assert_eq!(tx.amount, Amount::from_cents(123456));
    }

    #[test]
    fn test_leading_index_and_marks_are_stripped() {
        let tx = parse_transaction("20/03 3 @ ) UBER TRIP 25,90").unwrap();
        assert_eq!(tx.description, "UBER TRIP");

        let tx = parse_transaction("2 21/03 @ IFOOD 45,00").unwrap();
        assert_eq!(tx.date, "21/03");
        assert_eq!(tx.description, "IFOOD");
    }

    #[test]
    fn test_non_positive_amounts_are_rejected() {
        assert_eq!(
            parse_transaction("10/03 ESTORNO LOJA -50,00"),
            Err(Rejection::NonPositiveAmount)
        );
        assert_eq!(
            parse_transaction("10/03 AJUSTE 0,00"),
            Err(Rejection::NonPositiveAmount)
        );
    }

    #[test]
    fn test_false_positives_are_rejected() {
        assert_eq!(parse_transaction("SUPERMARKET 12,00"), Err(Rejection::NoDate));
        assert_eq!(parse_transaction("15/03 SUPERMARKET"), Err(Rejection::NoAmount));
        assert_eq!(parse_transaction("15/03 AB 12,00"), Err(Rejection::DescriptionTooShort));
        assert_eq!(parse_transaction("15/03 1.234 12,00"), Err(Rejection::NumericDescription));
        assert_eq!(parse_transaction("15/03 123/456 12,00"), Err(Rejection::FractionDescription));
    }

    #[test]
    fn test_amount_must_end_the_line() {
        assert_eq!(parse_transaction("15/03 LOJA 12,00 EXTRA"), Err(Rejection::NoAmount));
    }
}
