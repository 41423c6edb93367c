use tally_core::AccountError;
use tally_import::{JournalError, TokensError};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid rule '{0}': expected /pattern/flags with flags drawn from 'i' and 'x'")]
    Parse(String),
    #[error("Invalid rule '{rule}': {source}")]
    Regex {
        rule: String,
        source: regex::Error,
    },
    #[error("Invalid account tokens: {0}")]
    Tokens(#[from] TokensError),
    #[error("Invalid journal: {0}")]
    Journal(#[from] JournalError),
    #[error(transparent)]
    Account(#[from] AccountError),
}
