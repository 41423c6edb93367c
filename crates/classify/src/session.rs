use std::path::Path;
use tally_core::Transaction;

use crate::config::SessionConfig;
use crate::corpus::SimilarityCorpus;
use crate::dedup::DedupGuard;
use crate::error::ClassifyError;
use crate::learner::{ensure_exists, LearnStats};
use crate::ranker::{suggest, unique_in_order};
use crate::rules::RuleMatcher;

/// All learned state for one classification run. Nothing is persisted; a new
/// run rebuilds it from its sources.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) config: SessionConfig,
    pub(crate) rules: RuleMatcher,
    pub(crate) corpus: SimilarityCorpus,
    pub(crate) dedup: DedupGuard,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let corpus = SimilarityCorpus::new(config.zero_similarity);
        Self {
            config,
            rules: RuleMatcher::new(),
            corpus,
            dedup: DedupGuard::new(),
        }
    }

    /// Builds a fully trained session, or fails without returning anything.
    /// Both paths are checked before any learning starts.
    pub fn from_sources(
        config: SessionConfig,
        account_tokens: Option<&Path>,
        ledger: Option<&Path>,
    ) -> Result<Self, ClassifyError> {
        config.validate()?;
        for path in account_tokens.iter().chain(ledger.iter()) {
            ensure_exists(path)?;
        }

        let mut session = Session::new(config);
        let mut stats = LearnStats::default();
        if let Some(path) = account_tokens {
            stats += session.learn_from_account_tokens_file(path)?;
        }
        if let Some(path) = ledger {
            stats += session.learn_from_ledger_file(path)?;
        }
        tracing::info!(
            documents = stats.documents,
            rules = stats.rules,
            fingerprints = stats.fingerprints,
            accounts = session.corpus.len(),
            "session trained"
        );
        Ok(session)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleMatcher {
        &self.rules
    }

    pub fn corpus(&self) -> &SimilarityCorpus {
        &self.corpus
    }

    pub fn dedup(&self) -> &DedupGuard {
        &self.dedup
    }

    /// Ranked candidates for `tx`, repeats included.
    pub fn suggest(&self, tx: &Transaction) -> Vec<String> {
        suggest(&self.rules, &self.corpus, &tx.description)
    }

    pub fn suggest_unique(&self, tx: &Transaction) -> Vec<String> {
        unique_in_order(self.suggest(tx))
    }

    /// First suggestion, if anything is known about `tx`.
    pub fn best_account(&self, tx: &Transaction) -> Option<String> {
        self.suggest(tx).into_iter().next()
    }

    /// Placeholder for the direction of the money when nothing is suggested.
    /// Not a classification, so callers should not `accept` it.
    pub fn default_account(&self, tx: &Transaction) -> &str {
        if tx.amount.is_positive() {
            &self.config.default_into_account
        } else {
            &self.config.default_outof_account
        }
    }

    pub fn already_seen(&self, tx: &Transaction) -> bool {
        self.dedup.already_seen(tx.date, &tx.formatted_amount)
    }

    /// Feeds a confirmed classification back into the corpus so later
    /// transactions in the same run benefit. Returns whether anything was
    /// learned; `tokens_only` sessions never learn from answers.
    pub fn accept(&mut self, tx: &Transaction, account: &str) -> bool {
        if self.config.tokens_only {
            tracing::debug!(account, "tokens_only session, not learning accepted answer");
            return false;
        }
        let document = format!("{} {}", tx.description, tx.formatted_amount_negated);
        tracing::debug!(account, document = %document, "learning accepted answer");
        self.corpus.add_document(account, &document);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tally_core::{AmountFormat, Money};

    fn tx(amount: &str, desc: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            Money::from_decimal(Decimal::from_str(amount).unwrap()),
            desc,
            &AmountFormat::default(),
        )
    }

    #[test]
    fn accepted_answers_improve_later_suggestions() {
        let mut session = Session::new(SessionConfig::default());
        let first = tx("-4.50", "BLUE BOTTLE COFFEE");
        assert!(session.suggest(&first).is_empty());

        assert!(session.accept(&first, "Expenses:Coffee"));
        let second = tx("-5.00", "Blue Bottle Coffee Oakland");
        assert_eq!(session.suggest(&second), vec!["Expenses:Coffee"]);
        assert_eq!(session.corpus().term_count("Expenses:Coffee", "4"), 1);
    }

    #[test]
    fn tokens_only_ignores_accepted_answers() {
        let config = SessionConfig {
            tokens_only: true,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config);
        let t = tx("-4.50", "BLUE BOTTLE COFFEE");
        assert!(!session.accept(&t, "Expenses:Coffee"));
        assert!(session.corpus().is_empty());
    }

    #[test]
    fn fallback_account_follows_sign() {
        let session = Session::new(SessionConfig::default());
        assert_eq!(session.best_account(&tx("10", "mystery")), None);
        assert_eq!(session.default_account(&tx("10", "mystery")), "Income:Unknown");
        assert_eq!(session.default_account(&tx("-10", "mystery")), "Expenses:Unknown");
    }

    #[test]
    fn suggest_unique_drops_repeats() {
        let mut session = Session::new(SessionConfig::default());
        session.rules.add_rule("Expenses:Food", "/deli/i").unwrap();
        session.corpus.add_document("Expenses:Food", "corner deli");
        let t = tx("-8", "Corner Deli");
        assert_eq!(session.suggest(&t), vec!["Expenses:Food", "Expenses:Food"]);
        assert_eq!(session.suggest_unique(&t), vec!["Expenses:Food"]);
    }

    #[test]
    fn missing_sources_fail_before_learning() {
        let err = Session::from_sources(
            SessionConfig::default(),
            Some(Path::new("/definitely/not/here/tokens.toml")),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::Config(crate::config::ConfigError::MissingFile(_))
        ));
    }
}
