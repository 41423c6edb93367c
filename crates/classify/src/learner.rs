//! Bulk training of a [`Session`] from account tokens and journal history.
//!
//! Each call stages its work first and only touches the session once the
//! whole input is known to be valid, so a failed call leaves the session as
//! it was.

use std::ops::AddAssign;
use std::path::Path;
use tally_core::AccountPath;
use tally_import::{parse_journal, TokenFormat, TokenNode};

use crate::config::ConfigError;
use crate::error::ClassifyError;
use crate::rules::Rule;
use crate::session::Session;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LearnStats {
    pub documents: usize,
    pub rules: usize,
    pub fingerprints: usize,
}

impl AddAssign for LearnStats {
    fn add_assign(&mut self, rhs: Self) {
        self.documents += rhs.documents;
        self.rules += rhs.rules;
        self.fingerprints += rhs.fingerprints;
    }
}

enum Staged {
    Rule(Rule),
    Document { account: String, text: String },
}

pub(crate) fn ensure_exists(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConfigError::MissingFile(path.to_path_buf()))
    }
}

fn read_source(path: &Path) -> Result<String, ConfigError> {
    ensure_exists(path)?;
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn stage_node(
    node: &TokenNode,
    path: Option<&AccountPath>,
    staged: &mut Vec<Staged>,
) -> Result<(), ClassifyError> {
    match node {
        TokenNode::Branch(children) => {
            for (key, child) in children {
                let child_path = AccountPath::child_of(path, key)?;
                stage_node(child, Some(&child_path), staged)?;
            }
        }
        TokenNode::Absent => {
            let account = path.map(AccountPath::as_str).unwrap_or_default();
            tracing::warn!(account, "no tokens listed for account, skipping");
        }
        TokenNode::Leaf(items) => {
            if items.is_empty() {
                return Ok(());
            }
            let account = path.ok_or(tally_core::AccountError::Empty)?;
            for item in items {
                if item.starts_with('/') {
                    staged.push(Staged::Rule(Rule::parse(account.as_str(), item)?));
                } else {
                    staged.push(Staged::Document {
                        account: account.to_string(),
                        text: item.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

impl Session {
    /// Learns phrases and `/pattern/flags` rules from a token tree. Branch
    /// keys join into account paths with `:`.
    pub fn learn_from_account_tokens(&mut self, tree: &TokenNode) -> Result<LearnStats, ClassifyError> {
        let mut staged = Vec::new();
        stage_node(tree, None, &mut staged)?;

        let mut stats = LearnStats::default();
        for item in staged {
            match item {
                Staged::Rule(rule) => {
                    self.rules.push(rule);
                    stats.rules += 1;
                }
                Staged::Document { account, text } => {
                    self.corpus.add_document(&account, &text);
                    stats.documents += 1;
                }
            }
        }
        tracing::debug!(rules = stats.rules, documents = stats.documents, "learned account tokens");
        Ok(stats)
    }

    pub fn learn_from_account_tokens_file(&mut self, path: &Path) -> Result<LearnStats, ClassifyError> {
        let text = read_source(path)?;
        let tree = TokenNode::parse(&text, TokenFormat::from_path(path))?;
        self.learn_from_account_tokens(&tree)
    }

    /// Learns from journal history. Bank-account postings become duplicate
    /// fingerprints; every other posting becomes a `description amount`
    /// document for its account.
    pub fn learn_from_ledger(&mut self, ledger_text: &str) -> Result<LearnStats, ClassifyError> {
        let entries = parse_journal(ledger_text, &self.config.amount_format)?;

        let mut stats = LearnStats::default();
        for entry in &entries {
            for posting in &entry.postings {
                if posting.account == self.config.bank_account {
                    self.dedup.record_seen(entry.date, &posting.amount);
                    stats.fingerprints += 1;
                } else {
                    let document = format!("{} {}", entry.description, posting.amount);
                    self.corpus.add_document(&posting.account, &document);
                    stats.documents += 1;
                }
            }
        }
        tracing::debug!(
            entries = entries.len(),
            documents = stats.documents,
            fingerprints = stats.fingerprints,
            "learned journal"
        );
        Ok(stats)
    }

    pub fn learn_from_ledger_file(&mut self, path: &Path) -> Result<LearnStats, ClassifyError> {
        let text = read_source(path)?;
        self.learn_from_ledger(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use chrono::NaiveDate;
    use std::io::Write;

    fn leaf(items: &[&str]) -> TokenNode {
        TokenNode::Leaf(items.iter().map(|s| s.to_string()).collect())
    }

    fn branch(children: Vec<(&str, TokenNode)>) -> TokenNode {
        TokenNode::Branch(
            children
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn tokens_split_into_documents_and_rules() {
        let tree = branch(vec![(
            "Expenses",
            branch(vec![("Food", leaf(&["coffee", "/^STARBUCKS/i"]))]),
        )]);
        let mut session = Session::new(SessionConfig::default());
        let stats = session.learn_from_account_tokens(&tree).unwrap();

        assert_eq!(stats, LearnStats { documents: 1, rules: 1, fingerprints: 0 });
        assert_eq!(session.corpus().document_count("Expenses:Food"), 1);
        assert_eq!(session.corpus().term_count("Expenses:Food", "coffee"), 1);
        let rule = &session.rules().rules()[0];
        assert_eq!(rule.account, "Expenses:Food");
        assert!(rule.pattern.is_match("starbucks reserve"));
    }

    #[test]
    fn absent_leaf_contributes_nothing() {
        let tree = branch(vec![
            ("Income", branch(vec![("Salary", TokenNode::Absent)])),
            ("Expenses", branch(vec![("Rent", leaf(&[]))])),
        ]);
        let mut session = Session::new(SessionConfig::default());
        let stats = session.learn_from_account_tokens(&tree).unwrap();
        assert_eq!(stats, LearnStats::default());
        assert!(session.corpus().is_empty());
    }

    #[test]
    fn bad_rule_leaves_session_untouched() {
        let tree = branch(vec![(
            "Expenses",
            branch(vec![
                ("Food", leaf(&["coffee"])),
                ("Travel", leaf(&["/uber/q"])),
            ]),
        )]);
        let mut session = Session::new(SessionConfig::default());
        match session.learn_from_account_tokens(&tree) {
            Err(ClassifyError::Parse(text)) => assert_eq!(text, "/uber/q"),
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(session.corpus().is_empty());
        assert!(session.rules().is_empty());
    }

    #[test]
    fn ledger_postings_split_between_corpus_and_fingerprints() {
        let mut session = Session::new(SessionConfig::default());
        let stats = session
            .learn_from_ledger(
                "2020-01-01 Coffee Shop\n\tExpenses:Food\t\t\t\t\t$12.50\n\tAssets:Bank:Checking\t\t\t\t\t$-12.50\n\n",
            )
            .unwrap();
        assert_eq!(stats, LearnStats { documents: 1, rules: 0, fingerprints: 1 });
        assert_eq!(session.corpus().term_count("Expenses:Food", "coffee"), 1);
        assert_eq!(session.corpus().term_count("Expenses:Food", "12"), 1);
        assert_eq!(session.corpus().document_count("Assets:Bank:Checking"), 0);
        assert!(session
            .dedup()
            .already_seen(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), "$-12.50"));
    }

    #[test]
    fn malformed_ledger_learns_nothing() {
        let mut session = Session::new(SessionConfig::default());
        let result = session.learn_from_ledger(
            "2020-01-01 Good\n  Expenses:Food  $1\n  Assets:Bank:Checking  $-1\n\n2020-99-01 Bad\n  X  $1\n",
        );
        assert!(matches!(result, Err(ClassifyError::Journal(_))));
        assert!(session.corpus().is_empty());
        assert!(session.dedup().is_empty());
    }

    #[test]
    fn files_are_read_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let tokens_path = dir.path().join("tokens.json");
        let mut f = std::fs::File::create(&tokens_path).unwrap();
        f.write_all(br#"{"Expenses":{"Food":["coffee","/^STARBUCKS/i"],"Misc":null}}"#)
            .unwrap();

        let mut session = Session::new(SessionConfig::default());
        let stats = session.learn_from_account_tokens_file(&tokens_path).unwrap();
        assert_eq!(stats.rules, 1);
        assert_eq!(stats.documents, 1);
    }

    #[test]
    fn missing_files_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(SessionConfig::default());
        let missing = dir.path().join("ledger.dat");
        assert!(matches!(
            session.learn_from_ledger_file(&missing),
            Err(ClassifyError::Config(ConfigError::MissingFile(p))) if p == missing
        ));
        assert!(matches!(
            session.learn_from_account_tokens_file(&dir.path().join("tokens.toml")),
            Err(ClassifyError::Config(ConfigError::MissingFile(_)))
        ));
    }
}
