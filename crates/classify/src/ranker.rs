use std::collections::HashSet;

use crate::corpus::SimilarityCorpus;
use crate::rules::RuleMatcher;

/// Rule hits followed by similarity hits, in that order. Repeats are kept;
/// the first element is the default suggestion.
pub fn suggest(rules: &RuleMatcher, corpus: &SimilarityCorpus, description: &str) -> Vec<String> {
    let mut accounts = rules.match_description(description);
    accounts.extend(
        corpus
            .find_similar(description)
            .into_iter()
            .map(|s| s.account),
    );
    accounts
}

/// Drops repeats, keeping each account at its first position.
pub fn unique_in_order(accounts: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    accounts
        .into_iter()
        .filter(|a| seen.insert(a.clone()))
        .collect()
}
