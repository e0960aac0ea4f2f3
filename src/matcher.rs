use crate::config::MatcherConfig;
use crate::document::{JobMeta, JobPosting};
use crate::error::MatchError;
use crate::index::{split_postings, CorpusIndexer, FittedModel};
use crate::ranking::{MatchResult, Ranker};

/// Fit-then-match engine for a single scoring request.
///
/// Build one per request from the current job catalog, call [`JobMatcher::fit`],
/// then [`JobMatcher::match_resume`]. Instances are not meant to be shared
/// between requests; a new catalog means a new matcher.
pub struct JobMatcher {
    indexer: CorpusIndexer,
    model: Option<FittedModel>,
}

impl JobMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            indexer: CorpusIndexer::new(config),
            model: None,
        }
    }

    /// Fit on the job catalog, replacing any previous fit.
    ///
    /// An empty vocabulary is not an error here: the matcher falls back to a
    /// model that scores every job 0.
    pub fn fit<S: AsRef<str>>(
        &mut self,
        job_texts: &[S],
        job_meta: &[JobMeta],
    ) -> Result<(), MatchError> {
        self.model = None;

        let model = match self.indexer.fit(job_texts, job_meta) {
            Ok(model) => model,
            Err(MatchError::DegenerateVocabulary) => {
                tracing::warn!(
                    jobs = job_meta.len(),
                    "job descriptions have no usable terms, all scores will be zero"
                );
                FittedModel::degenerate(self.indexer.tokenizer(), job_meta)
            }
            Err(e) => return Err(e),
        };

        self.model = Some(model);
        Ok(())
    }

    pub fn fit_postings(&mut self, jobs: &[JobPosting]) -> Result<(), MatchError> {
        let (texts, meta) = split_postings(jobs);
        self.fit(&texts, &meta)
    }

    /// Score the resume against every fitted job, preserving job order
    pub fn match_resume(&self, resume_text: &str) -> Result<Vec<MatchResult>, MatchError> {
        let model = self.model.as_ref().ok_or(MatchError::NotFitted)?;
        Ok(Ranker::new(model).match_resume(resume_text))
    }

    pub fn model(&self) -> Option<&FittedModel> {
        self.model.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }
}

impl Default for JobMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}
