use thiserror::Error;

/// Errors raised by the matching core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// `fit` was called with no job documents.
    #[error("cannot fit a model on an empty job corpus")]
    EmptyCorpus,

    /// Every job document tokenized to zero terms (or all terms were pruned).
    #[error("job corpus produced an empty vocabulary")]
    DegenerateVocabulary,

    /// `match_resume` was called before a successful `fit`.
    #[error("matcher has not been fitted")]
    NotFitted,

    #[error("got {texts} job texts but {meta} job metadata entries")]
    LengthMismatch { texts: usize, meta: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while turning an uploaded file into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),
}

#[derive(Debug, Error)]
#[error("resume {0} not found")]
pub struct ResumeNotFound(pub u64);
