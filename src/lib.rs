// Re-export main components
pub mod api;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod extract;
pub mod index;
pub mod matcher;
pub mod ranking;
pub mod skills;
pub mod storage;
pub mod tokenizer;
pub mod vector;

// Re-export commonly used types
pub use config::{AppConfig, MatcherConfig, TokenizerConfig};
pub use document::{JobMeta, JobPosting, Resume};
pub use engine::{Scorecard, ScoringEngine};
pub use error::{ExtractError, MatchError, ResumeNotFound};
pub use extract::{PlainTextExtractor, TextExtractor};
pub use index::{CorpusIndexer, FittedModel, Vocabulary};
pub use matcher::JobMatcher;
pub use ranking::{best_match, MatchResult, Ranker};
pub use storage::Storage;
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
