use crate::config::AppConfig;
use crate::document::{JobPosting, Resume};
use crate::error::{MatchError, ResumeNotFound};
use crate::extract::{secure_filename, PlainTextExtractor, TextExtractor};
use crate::index::{CorpusIndexer, ModelStats};
use crate::matcher::JobMatcher;
use crate::ranking::{best_match, MatchResult};
use crate::skills::{default_skills, extract_skills, load_skills};
use crate::storage::Storage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Outcome of scoring one resume against the current catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// One entry per job, in catalog order
    pub results: Vec<MatchResult>,
    pub ats_score: Option<f64>,
    pub best_job: Option<String>,
    pub skills: Vec<String>,
}

impl Scorecard {
    fn unscored(skills: Vec<String>) -> Self {
        Self {
            results: Vec::new(),
            ats_score: None,
            best_job: None,
            skills,
        }
    }
}

/// Upload, extract, store and score resumes against the stored job catalog.
///
/// Each scoring call fits a fresh [`JobMatcher`] on the catalog as it is at
/// that moment; nothing fitted outlives the call.
pub struct ScoringEngine {
    storage: Storage,
    config: AppConfig,
    extractor: Box<dyn TextExtractor>,
    skills: Vec<String>,
}

impl ScoringEngine {
    /// Open the configured database and upload directory
    pub fn new(config: AppConfig) -> Result<Self> {
        let storage = Storage::open(&config.db_path)?;
        Self::with_storage(storage, config)
    }

    /// Engine over an in-memory database (for testing)
    pub fn in_memory(config: AppConfig) -> Result<Self> {
        Self::with_storage(Storage::in_memory()?, config)
    }

    fn with_storage(storage: Storage, config: AppConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.upload_dir).with_context(|| {
            format!("Failed to create upload directory {}", config.upload_dir.display())
        })?;

        let skills = match &config.skills_path {
            Some(path) => load_skills(path)?,
            None => default_skills(),
        };

        storage.seed_default_jobs()?;

        Ok(Self {
            storage,
            config,
            extractor: Box::new(PlainTextExtractor),
            skills,
        })
    }

    pub fn with_extractor<E: TextExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    /// Save an uploaded file, extract its text and store the resume.
    ///
    /// Extraction failures are not fatal: the resume is stored with empty text
    /// and will score 0 against every job.
    pub fn upload(&self, filename: &str, bytes: &[u8]) -> Result<u64> {
        if filename.trim().is_empty() {
            return Err(MatchError::InvalidInput("no file selected".to_string()).into());
        }

        let filename = secure_filename(filename);
        let id = self.storage.reserve_resume_id()?;

        // One file per upload, even for repeated names
        let path = self.config.upload_dir.join(format!("{}_{}", id, filename));
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to save upload {}", path.display()))?;

        let text = match self.extractor.extract_text(&path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(file = %filename, error = %e, "no text extracted from upload");
                String::new()
            }
        };

        self.storage.store_resume(id, &filename, &text)?;
        self.storage.flush()?;
        tracing::info!(id, file = %filename, chars = text.len(), "stored resume");

        Ok(id)
    }

    pub fn resume(&self, id: u64) -> Result<Option<Resume>> {
        self.storage.get_resume(id)
    }

    /// Score a stored resume and record its best match
    pub fn results(&self, resume_id: u64) -> Result<Scorecard> {
        let resume = self
            .storage
            .get_resume(resume_id)?
            .ok_or(ResumeNotFound(resume_id))?;

        let scorecard = self.score_text(&resume.text)?;

        if let (Some(ats), Some(job)) = (scorecard.ats_score, scorecard.best_job.as_deref()) {
            self.storage.record_score(resume_id, ats, job)?;
            self.storage.flush()?;
            tracing::info!(id = resume_id, ats, best_job = job, "scored resume");
        }

        Ok(scorecard)
    }

    /// Score free text against the catalog without storing anything.
    ///
    /// An empty catalog yields a scorecard with no results and no best job.
    pub fn score_text(&self, text: &str) -> Result<Scorecard> {
        let jobs = self.storage.all_jobs()?;
        let skills = extract_skills(text, &self.skills);

        let mut matcher = JobMatcher::new(self.config.matcher.clone());
        match matcher.fit_postings(&jobs) {
            Ok(()) => {}
            Err(MatchError::EmptyCorpus) => {
                tracing::warn!("job catalog is empty, nothing to match against");
                return Ok(Scorecard::unscored(skills));
            }
            Err(e) => return Err(e.into()),
        }

        let results = matcher.match_resume(text)?;
        let best = best_match(&results);

        Ok(Scorecard {
            ats_score: best.map(|b| b.ats),
            best_job: best.map(|b| b.job.clone()),
            results,
            skills,
        })
    }

    pub fn jobs(&self) -> Result<Vec<JobPosting>> {
        self.storage.all_jobs()
    }

    pub fn add_job(&self, job: &JobPosting) -> Result<u64> {
        if job.title.trim().is_empty() {
            return Err(MatchError::InvalidInput("job title must not be empty".to_string()).into());
        }
        let id = self.storage.add_job(job)?;
        self.storage.flush()?;
        tracing::info!(id, title = %job.title, "added job posting");
        Ok(id)
    }

    /// Statistics of a model fitted on the current catalog, if it can be fitted
    pub fn stats(&self) -> Result<Option<ModelStats>> {
        let jobs = self.storage.all_jobs()?;
        match CorpusIndexer::new(self.config.matcher.clone()).fit_postings(&jobs) {
            Ok(model) => Ok(Some(model.stats())),
            Err(MatchError::EmptyCorpus | MatchError::DegenerateVocabulary) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every resume and job, then restore the default catalog
    pub fn reset(&self) -> Result<()> {
        self.storage.clear()?;
        self.storage.seed_default_jobs()?;
        self.storage.flush()
    }
}
