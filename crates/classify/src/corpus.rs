//! Per-account term-frequency vectors scored by cosine similarity.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::config::ZeroSimilarity;
use crate::tokenize::term_frequencies;

#[derive(Debug, Clone, PartialEq)]
pub struct Similarity {
    pub account: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
struct AccountVector {
    account: String,
    terms: BTreeMap<String, u32>,
    documents: usize,
    norm: f64,
}

impl AccountVector {
    fn absorb(&mut self, counts: BTreeMap<String, u32>) {
        for (term, count) in counts {
            *self.terms.entry(term).or_insert(0) += count;
        }
        self.documents += 1;
        self.norm = euclidean_norm(&self.terms);
    }
}

/// Grows only: documents are never removed and counts never decrease.
#[derive(Debug, Clone, Default)]
pub struct SimilarityCorpus {
    /// Registration order, which is also the tie-break order.
    vectors: Vec<AccountVector>,
    index: HashMap<String, usize>,
    zero_similarity: ZeroSimilarity,
}

impl SimilarityCorpus {
    pub fn new(zero_similarity: ZeroSimilarity) -> Self {
        Self {
            zero_similarity,
            ..Self::default()
        }
    }

    /// Adds `text`'s terms to `account`'s vector. Text without any term is ignored.
    pub fn add_document(&mut self, account: &str, text: &str) {
        let counts = term_frequencies(text);
        if counts.is_empty() {
            return;
        }
        let idx = match self.index.get(account) {
            Some(&idx) => idx,
            None => {
                self.vectors.push(AccountVector {
                    account: account.to_string(),
                    ..AccountVector::default()
                });
                self.index.insert(account.to_string(), self.vectors.len() - 1);
                self.vectors.len() - 1
            }
        };
        self.vectors[idx].absorb(counts);
    }

    /// Accounts ranked by cosine similarity to `text`, best first. Equal scores
    /// keep registration order.
    pub fn find_similar(&self, text: &str) -> Vec<Similarity> {
        let query = term_frequencies(text);
        let query_norm = euclidean_norm(&query);

        let mut scored: Vec<Similarity> = self
            .vectors
            .iter()
            .map(|v| Similarity {
                account: v.account.clone(),
                score: cosine(&query, query_norm, v),
            })
            .filter(|s| s.score > 0.0 || self.zero_similarity == ZeroSimilarity::Include)
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn document_count(&self, account: &str) -> usize {
        self.vector(account).map_or(0, |v| v.documents)
    }

    pub fn term_count(&self, account: &str, term: &str) -> u32 {
        self.vector(account)
            .and_then(|v| v.terms.get(term).copied())
            .unwrap_or(0)
    }

    fn vector(&self, account: &str) -> Option<&AccountVector> {
        self.index.get(account).map(|&idx| &self.vectors[idx])
    }
}

fn euclidean_norm(terms: &BTreeMap<String, u32>) -> f64 {
    terms
        .values()
        .map(|&c| f64::from(c) * f64::from(c))
        .sum::<f64>()
        .sqrt()
}

fn cosine(query: &BTreeMap<String, u32>, query_norm: f64, vector: &AccountVector) -> f64 {
    if query_norm == 0.0 || vector.norm == 0.0 {
        return 0.0;
    }
    let dot: f64 = query
        .iter()
        .filter_map(|(term, &q)| vector.terms.get(term).map(|&d| f64::from(q) * f64::from(d)))
        .sum();
    dot / (query_norm * vector.norm)
}
