use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tally_core::{AccountError, AccountPath, AmountFormat};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid {field}: {source}")]
    InvalidAccount {
        field: &'static str,
        source: AccountError,
    },
}

/// Whether accounts sharing no term with a query are still listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroSimilarity {
    #[default]
    Exclude,
    Include,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// The account the statement belongs to.
    pub bank_account: String,
    /// Rely on the token file alone: accepted answers are not learned.
    pub tokens_only: bool,
    pub zero_similarity: ZeroSimilarity,
    pub amount_format: AmountFormat,
    pub date_format: String,
    /// Fallback for money coming in when nothing is suggested.
    pub default_into_account: String,
    /// Fallback for money going out when nothing is suggested.
    pub default_outof_account: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bank_account: "Assets:Bank:Checking".to_string(),
            tokens_only: false,
            zero_similarity: ZeroSimilarity::Exclude,
            amount_format: AmountFormat::default(),
            date_format: "%Y-%m-%d".to_string(),
            default_into_account: "Income:Unknown".to_string(),
            default_outof_account: "Expenses:Unknown".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("bank_account", &self.bank_account),
            ("default_into_account", &self.default_into_account),
            ("default_outof_account", &self.default_outof_account),
        ] {
            AccountPath::new(value.as_str())
                .map_err(|source| ConfigError::InvalidAccount { field, source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(SessionConfig::from_toml("").unwrap(), SessionConfig::default());
    }

    #[test]
    fn parses_overrides() {
        let config = SessionConfig::from_toml(
            r#"
bank_account = "Assets:Bank:Savings"
tokens_only = true
zero_similarity = "include"

[amount_format]
currency = "EUR"
suffixed = true
"#,
        )
        .unwrap();
        assert_eq!(config.bank_account, "Assets:Bank:Savings");
        assert!(config.tokens_only);
        assert_eq!(config.zero_similarity, ZeroSimilarity::Include);
        assert_eq!(config.amount_format.currency, "EUR");
        assert!(!config.amount_format.comma_separates_cents);
        assert_eq!(config.date_format, "%Y-%m-%d");
    }

    #[test]
    fn rejects_blank_bank_account() {
        let err = SessionConfig::from_toml("bank_account = \"\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidAccount {
                field: "bank_account",
                ..
            }
        ));
    }
}
