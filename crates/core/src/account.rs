use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const ACCOUNT_SEPARATOR: char = ':';

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account path must not be empty")]
    Empty,
}

/// Colon-separated hierarchical account name, e.g. `Expenses:Food`.
///
/// Opaque to the classifier beyond being non-empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountPath(String);

impl AccountPath {
    pub fn new(path: impl Into<String>) -> Result<Self, AccountError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(AccountError::Empty);
        }
        Ok(AccountPath(path))
    }

    /// Appends one segment; an empty parent yields the segment alone.
    pub fn child_of(parent: Option<&AccountPath>, segment: &str) -> Result<Self, AccountError> {
        match parent {
            Some(p) => AccountPath::new(format!("{}{ACCOUNT_SEPARATOR}{segment}", p.0)),
            None => AccountPath::new(segment),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccountPath {
    type Error = AccountError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        AccountPath::new(value)
    }
}

impl From<AccountPath> for String {
    fn from(value: AccountPath) -> Self {
        value.0
    }
}

impl AsRef<str> for AccountPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_paths() {
        assert_eq!(AccountPath::new(""), Err(AccountError::Empty));
        assert_eq!(AccountPath::new("   "), Err(AccountError::Empty));
    }

    #[test]
    fn child_of_joins_with_colon() {
        let expenses = AccountPath::child_of(None, "Expenses").unwrap();
        let food = AccountPath::child_of(Some(&expenses), "Food").unwrap();
        assert_eq!(food.as_str(), "Expenses:Food");
    }
}
