use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_classify::SessionConfig;
use tally_import::CsvImportProfile;

/// Contents of `tally.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub statement: CsvImportProfile,
    pub account_tokens: Option<PathBuf>,
    pub ledger: Option<PathBuf>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(p) = path else {
        return Ok(Config::default());
    };
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_classify::ZeroSimilarity;

    #[test]
    fn missing_path_gives_defaults() {
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg.session.bank_account, "Assets:Bank:Checking");
        assert!(cfg.ledger.is_none());
    }

    #[test]
    fn reads_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        fs::write(
            &path,
            r#"
account_tokens = "tokens.toml"
ledger = "books.ledger"

[session]
bank_account = "Assets:Bank:Savings"
zero_similarity = "include"

[statement]
has_header = false
invert = true

[statement.mapping]
date_column = 1
description_columns = [3, 4]
amount_column = 2
"#,
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.session.bank_account, "Assets:Bank:Savings");
        assert_eq!(cfg.session.zero_similarity, ZeroSimilarity::Include);
        assert!(cfg.statement.invert);
        assert_eq!(cfg.statement.mapping.description_columns, vec![3, 4]);
        assert_eq!(cfg.statement.mapping.date_format, "%Y-%m-%d");
        assert_eq!(cfg.ledger, Some(PathBuf::from("books.ledger")));
    }
}
