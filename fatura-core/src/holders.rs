//! Card holder allow-list.
//!
//! Only cards whose header names one of the allow-listed holders contribute
//! transactions. Matching is a case-insensitive substring check.

use serde::{Deserialize, Serialize};

/// One allow-listed holder: a name fragment and the owner label it maps to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HolderRule {
    /// Name fragment looked for in card header lines, e.g. `RODRIGO`
    pub pattern: String,
    /// Owner label put on records, e.g. `Rodrigo`
    pub label: String,
}

impl HolderRule {
    pub fn new(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.to_string(),
        }
    }

    /// True when `text` contains this rule's pattern, ignoring case
    pub fn matches(&self, text: &str) -> bool {
        !self.pattern.is_empty() && text.to_uppercase().contains(&self.pattern.to_uppercase())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HolderAllowList {
    pub rules: Vec<HolderRule>,
}

impl HolderAllowList {
    pub fn new(rules: Vec<HolderRule>) -> Self {
        Self { rules }
    }

    /// First rule (in configured order) whose pattern occurs in `text`
    pub fn find(&self, text: &str) -> Option<&HolderRule> {
        self.rules.iter().find(|r| r.matches(text))
    }

    pub fn includes(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Owner label for a holder name; the name itself when no rule applies.
    pub fn owner_label(&self, holder_name: &str) -> String {
        self.find(holder_name)
            .map(|r| r.label.clone())
            .unwrap_or_else(|| holder_name.to_string())
    }
}
