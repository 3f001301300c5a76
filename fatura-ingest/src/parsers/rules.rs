//! Scanner vocabulary: holder allow-list, section labels, due-date labels and
//! the noise phrases that mark summary/boilerplate lines.
//!
//! [`ScanConfig`] is the serializable form; [`ScanRules`] is the validated,
//! regex-compiled form the scanner runs on.

use fatura_core::{HolderAllowList, HolderRule, Section, parse_due_date};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Holder name used when a card header names nobody recognisable
    pub unknown_holder: String,
    /// Whole-line labels that open an installment section
    pub installment_labels: Vec<String>,
    /// Whole-line labels that open a regular purchases section
    pub cash_labels: Vec<String>,
    /// Labels preceding the due date, e.g. `Vencimento: 10/04/2024`
    pub due_date_labels: Vec<String>,
    /// Case-insensitive regexes; a matching line is summary/boilerplate
    pub noise_patterns: Vec<String>,
    /// Card holders whose transactions are extracted
    pub holders: Vec<HolderRule>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            unknown_holder: "OUTRO".to_string(),
            installment_labels: strings(&["Parcelamento", "Parcelamentos", "Installment", "Installments"]),
            cash_labels: strings(&["Despesa", "Despesas", "Purchases", "Cash"]),
            due_date_labels: strings(&["Vencimento", "Due date"]),
            noise_patterns: strings(&[
                "COTAÇÃO",
                "IOF",
                "VALOR TOTAL",
                r"Compra\s+Data",
                "SUPERCRÉDITO",
                "Total a pagar",
                "Pagamento",
                "Resumo",
                "Saldo",
                "CET",
                "Juros",
                "ANUIDADE",
                "Esfera",
                "Central",
                "DEMONSTRATIVO",
                "Detalhamento",
                r"Parcela\s+R\$",
                "Descrição",
            ]),
            holders: vec![
                HolderRule::new("RODRIGO", "Rodrigo"),
                HolderRule::new("LUANA", "Luana"),
            ],
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Holder rule plus the regex that lifts the full name out of a header line
#[derive(Debug, Clone)]
pub(crate) struct HolderMatcher {
    pub(crate) rule: HolderRule,
    pub(crate) name_re: Regex,
}

#[derive(Debug, Clone)]
pub struct ScanRules {
    pub(crate) holders: Vec<HolderMatcher>,
    allow_list: HolderAllowList,
    unknown_holder: String,
    installment_labels: Vec<String>,
    cash_labels: Vec<String>,
    due_date: Option<Regex>,
    noise: Option<Regex>,
}

impl ScanRules {
    pub fn compile(config: &ScanConfig) -> Result<Self, ConfigError> {
        let mut holders = Vec::with_capacity(config.holders.len());
        for rule in config.holders.iter().filter(|r| !r.pattern.trim().is_empty()) {
            let name = rule.pattern.trim();
            let pattern = format!(r"(?i){}[A-Z\s]*", regex::escape(name));
            holders.push(HolderMatcher {
                rule: HolderRule::new(name, &rule.label),
                name_re: compile(&pattern)?,
            });
        }

        for p in &config.noise_patterns {
            compile(p)?;
        }
        let noise = if config.noise_patterns.is_empty() {
            None
        } else {
            let alternation = config
                .noise_patterns
                .iter()
                .map(|p| format!("(?:{p})"))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!("(?i){alternation}"))?)
        };

        let due_date = if config.due_date_labels.is_empty() {
            None
        } else {
            let labels = config
                .due_date_labels
                .iter()
                .map(|l| {
                    l.split_whitespace()
                        .map(regex::escape)
                        .collect::<Vec<_>>()
                        .join(r"\s+")
                })
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!(r"(?i)(?:{labels})[:\s]+(\d{{2}}/\d{{2}}/\d{{4}})"))?)
        };

        Ok(Self {
            allow_list: HolderAllowList::new(holders.iter().map(|h| h.rule.clone()).collect()),
            holders,
            unknown_holder: config.unknown_holder.clone(),
            installment_labels: lowercase_all(&config.installment_labels),
            cash_labels: lowercase_all(&config.cash_labels),
            due_date,
            noise,
        })
    }

    pub fn allow_list(&self) -> &HolderAllowList {
        &self.allow_list
    }

    pub fn unknown_holder(&self) -> &str {
        &self.unknown_holder
    }

    /// Section opened by a line consisting solely of a section label
    pub fn section_marker(&self, text: &str) -> Option<Section> {
        let t = text.trim().to_lowercase();
        if self.installment_labels.contains(&t) {
            Some(Section::Installment)
        } else if self.cash_labels.contains(&t) {
            Some(Section::Cash)
        } else {
            None
        }
    }

    pub fn is_noise(&self, text: &str) -> bool {
        self.noise.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Due date printed on this line (`DD/MM/YYYY`), if it is a valid calendar date
    pub fn due_date(&self, text: &str) -> Option<String> {
        let caps = self.due_date.as_ref()?.captures(text)?;
        let raw = caps.get(1)?.as_str();
        parse_due_date(raw).map(|_| raw.to_string())
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.trim().to_lowercase()).collect()
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ScanRules {
        ScanRules::compile(&ScanConfig::default()).unwrap()
    }

    #[test]
    fn test_section_markers_are_whole_line_and_case_insensitive() {
        let r = rules();
        assert_eq!(r.section_marker("Parcelamentos"), Some(Section::Installment));
        assert_eq!(r.section_marker("  PARCELAMENTO "), Some(Section::Installment));
        assert_eq!(r.section_marker("Despesas"), Some(Section::Cash));
        assert_eq!(r.section_marker("Despesas do mês"), None);
        assert_eq!(r.section_marker("15/03 PARCELAMENTO 10,00"), None);
    }

    #[test]
    fn test_noise_vocabulary() {
        let r = rules();
        assert!(r.is_noise("VALOR TOTAL 1.234,56"));
        assert!(r.is_noise("Total a pagar R$ 10,00"));
        assert!(r.is_noise("Compra   Data Descrição"));
        assert!(r.is_noise("juros do rotativo"));
        assert!(!r.is_noise("15/03 SUPERMARKET XYZ 123,45"));
    }

    #[test]
    fn test_no_noise_patterns_means_nothing_is_noise() {
        let cfg = ScanConfig {
            noise_patterns: vec![],
            ..ScanConfig::default()
        };
        let r = ScanRules::compile(&cfg).unwrap();
        assert!(!r.is_noise("VALOR TOTAL"));
    }

    #[test]
    fn test_due_date_labels() {
        let r = rules();
        assert_eq!(r.due_date("Vencimento: 10/04/2024").as_deref(), Some("10/04/2024"));
        assert_eq!(r.due_date("Due date: 10/04/2024").as_deref(), Some("10/04/2024"));
        assert_eq!(r.due_date("vencimento 05/01/2025 total").as_deref(), Some("05/01/2025"));
        assert_eq!(r.due_date("Vencimento: 31/02/2024"), None);
        assert_eq!(r.due_date("10/04/2024"), None);
    }

    #[test]
    fn test_invalid_noise_pattern_is_config_error() {
        let cfg = ScanConfig {
            noise_patterns: vec!["(unclosed".into()],
            ..ScanConfig::default()
        };
        let err = ScanRules::compile(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_blank_holder_patterns_are_ignored() {
        let cfg = ScanConfig {
            holders: vec![HolderRule::new("  ", "Nobody"), HolderRule::new("ANA", "Ana")],
            ..ScanConfig::default()
        };
        let r = ScanRules::compile(&cfg).unwrap();
        assert_eq!(r.allow_list().rules.len(), 1);
    }
}
