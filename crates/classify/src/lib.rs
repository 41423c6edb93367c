pub mod config;
pub mod corpus;
pub mod dedup;
pub mod error;
pub mod learner;
pub mod ranker;
pub mod rules;
pub mod session;
pub mod tokenize;

pub use config::{ConfigError, SessionConfig, ZeroSimilarity};
pub use corpus::{Similarity, SimilarityCorpus};
pub use dedup::{fingerprint, DedupGuard};
pub use error::ClassifyError;
pub use learner::LearnStats;
pub use ranker::{suggest, unique_in_order};
pub use rules::{Rule, RuleMatcher};
pub use session::Session;
