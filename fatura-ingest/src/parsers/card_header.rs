//! Card header lines.
//!
//! A header identifies the card and its holder, e.g.
//!   @ RODRIGO S SILVA - 4258 XXXX XXXX 1234
//! and opens a new card context for the lines that follow.

use fatura_core::{Section, card_label};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::rules::ScanRules;

/// State carried from a card header to the lines after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardContext {
    pub holder_name: String,
    /// Last four digits of the card number
    pub card_suffix: String,
    /// Whether this card's holder is allow-listed
    pub include: bool,
    pub section: Section,
}

impl CardContext {
    pub fn card_label(&self) -> String {
        card_label(&self.holder_name, &self.card_suffix)
    }
}

fn masked_card_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)[x*]{4,}|\d{4}\s*x+\s*x+\s*\d{4}").expect("masked card regex")
    })
}

fn digit_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("digit run regex"))
}

fn leading_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[@\s]*([A-Z][A-Z\s]+?)\s*[-–]").expect("leading name regex")
    })
}

/// True when the line carries a masked card number.
pub fn is_card_header(text: &str) -> bool {
    masked_card_re().is_match(text)
}

/// Last run of exactly four digits on the line, `0000` when there is none.
///
/// Digit runs are delimited by any non-digit, so a suffix glued to the mask
/// (`XXXX1234`) is still found.
pub fn card_suffix(text: &str) -> String {
    digit_run_re()
        .find_iter(text)
        .filter(|m| m.as_str().len() == 4)
        .last()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "0000".to_string())
}

/// Holder name, by priority: allow-listed name, leading phrase before a dash, placeholder.
pub fn holder_name(text: &str, rules: &ScanRules) -> String {
    for holder in &rules.holders {
        if holder.rule.matches(text) {
            return holder
                .name_re
                .find(text)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| holder.rule.pattern.clone());
        }
    }

    leading_name_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| rules.unknown_holder().to_string())
}

/// Fresh card context when `text` is a card header line.
///
/// Every new header starts in the regular purchases section.
pub fn parse_card_header(text: &str, rules: &ScanRules) -> Option<CardContext> {
    if !is_card_header(text) {
        return None;
    }

    Some(CardContext {
        holder_name: holder_name(text, rules),
        card_suffix: card_suffix(text),
        include: rules.allow_list().includes(text),
        section: Section::Cash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::rules::ScanConfig;

    fn rules() -> ScanRules {
        ScanRules::compile(&ScanConfig::default()).unwrap()
    }

    #[test]
    fn test_detects_masked_card_patterns() {
        assert!(is_card_header("RODRIGO S SILVA - 4258 XXXX XXXX 1234"));
        assert!(is_card_header("LUANA M COSTA - XXXX 5678"));
        assert!(is_card_header("MARIA - **** **** **** 9012"));
        assert!(is_card_header("4258xx xx1234"));
        assert!(!is_card_header("15/03 SUPERMARKET XYZ 123,45"));
        assert!(!is_card_header("Parcelamentos"));
    }

    #[test]
    fn test_suffix_glued_to_mask() {
        assert_eq!(card_suffix("4258XXXXXXXX1234"), "1234");
        assert_eq!(card_suffix("XXXX XXXX XXXX5678"), "5678");
        assert_eq!(card_suffix("**** **** ****9012"), "9012");
        assert_eq!(card_suffix("XXXX XXXX 12345"), "0000");

        let ctx = parse_card_header("RODRIGO S SILVA - 4258XXXXXXXX1234", &rules()).unwrap();
        assert_eq!(ctx.card_label(), "RODRIGO S SILVA – 1234");
        let ctx = parse_card_header("LUANA M COSTA - XXXX XXXX XXXX5678", &rules()).unwrap();
        assert_eq!(ctx.card_suffix, "5678");
    }

    #[test]
    fn test_allow_listed_holder() {
        let ctx = parse_card_header("@ RODRIGO S SILVA - 4258 XXXX XXXX 1234", &rules()).unwrap();
        assert_eq!(ctx.holder_name, "RODRIGO S SILVA");
        assert_eq!(ctx.card_suffix, "1234");
        assert!(ctx.include);
        assert_eq!(ctx.section, Section::Cash);
        assert_eq!(ctx.card_label(), "RODRIGO S SILVA – 1234");
    }

    #[test]
    fn test_unlisted_holder_uses_leading_phrase() {
        let ctx = parse_card_header("MARIA SOUZA - 4258 XXXX XXXX 9999", &rules()).unwrap();
        assert_eq!(ctx.holder_name, "MARIA SOUZA");
        assert_eq!(ctx.card_suffix, "9999");
        assert!(!ctx.include);
    }

    #[test]
    fn test_unrecognised_header_falls_back_to_placeholder() {
        let ctx = parse_card_header("XXXX XXXX XXXX", &rules()).unwrap();
        assert_eq!(ctx.holder_name, "OUTRO");
        assert_eq!(ctx.card_suffix, "0000");
        assert!(!ctx.include);
    }

    #[test]
    fn test_lowercase_allow_listed_name() {
        let ctx = parse_card_header("luana costa – XXXX XXXX 5678", &rules()).unwrap();
        assert_eq!(ctx.holder_name, "luana costa");
        assert!(ctx.include);
    }
}
