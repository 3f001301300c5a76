//! Parser configuration: layout geometry, scanner vocabulary and display locale.
//!
//! Every field has a default tuned to the Santander two-column statement, so
//! an empty TOML document is a valid configuration.

use fatura_core::Locale;
use fatura_ingest::{ConfigError, LayoutConfig, ScanConfig, ScanRules};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParserConfig {
    /// Language of the billing period label
    pub locale: Locale,
    pub layout: LayoutConfig,
    pub scan: ScanConfig,
}

impl ParserConfig {
    /// Validate geometry and compile the scanner vocabulary.
    pub fn compile(&self) -> Result<ScanRules, ConfigError> {
        self.layout.validate()?;
        ScanRules::compile(&self.scan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let cfg: ParserConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, ParserConfig::default());
        assert_eq!(cfg.layout.column_split_x, 300.0);
        assert_eq!(cfg.scan.holders.len(), 2);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let cfg: ParserConfig = toml::from_str(
            r#"
locale = "en"

[layout]
column_split_x = 280.0

[scan]
unknown_holder = "UNKNOWN"

[[scan.holders]]
pattern = "ANA"
label = "Ana"
"#,
        )
        .unwrap();
        assert_eq!(cfg.locale, Locale::En);
        assert_eq!(cfg.layout.column_split_x, 280.0);
        assert_eq!(cfg.layout.y_bucket, 3.0);
        assert_eq!(cfg.scan.unknown_holder, "UNKNOWN");
        assert_eq!(cfg.scan.holders.len(), 1);
        assert!(!cfg.scan.noise_patterns.is_empty());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let cfg = ParserConfig::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: ParserConfig = toml::from_str(&s).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_compile_reports_invalid_layout() {
        let mut cfg = ParserConfig::default();
        cfg.layout.y_bucket = -1.0;
        assert!(matches!(cfg.compile(), Err(ConfigError::InvalidLayout(_))));
    }
}
