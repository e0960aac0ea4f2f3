use crate::config::MatcherConfig;
use crate::document::{JobMeta, JobPosting};
use crate::error::MatchError;
use crate::tokenizer::Tokenizer;
use crate::vector::SparseVector;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Term -> index mapping for one fitted corpus.
///
/// Indices follow sorted term order, so fitting the same corpus twice yields
/// the same indices.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: HashMap<String, usize>,
}

impl Vocabulary {
    fn from_sorted_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let terms = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();
        Self { terms }
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms ordered by their index
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<(&str, usize)> =
            self.terms.iter().map(|(t, &i)| (t.as_str(), i)).collect();
        terms.sort_by_key(|&(_, i)| i);
        terms.into_iter().map(|(t, _)| t).collect()
    }
}

/// A job's metadata together with its unit-length tf-idf vector
#[derive(Debug, Clone)]
pub struct JobVector {
    pub meta: JobMeta,
    pub vector: SparseVector,
}

/// Vocabulary, idf weights and job vectors produced by one fit.
///
/// A model is a read-only snapshot of the catalog it was fitted on. Resumes
/// are always projected with the model's own tokenizer and weights.
pub struct FittedModel {
    tokenizer: Tokenizer,
    vocabulary: Vocabulary,
    idf: Vec<f64>,
    jobs: Vec<JobVector>,
}

impl FittedModel {
    /// A model with an empty vocabulary. Every projection is the zero vector,
    /// so every job scores 0.
    pub fn degenerate(tokenizer: Tokenizer, job_meta: &[JobMeta]) -> Self {
        let jobs = job_meta
            .iter()
            .cloned()
            .map(|meta| JobVector {
                meta,
                vector: SparseVector::default(),
            })
            .collect();

        Self {
            tokenizer,
            vocabulary: Vocabulary::default(),
            idf: Vec::new(),
            jobs,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn idf_of(&self, term: &str) -> Option<f64> {
        self.vocabulary.index_of(term).map(|idx| self.idf[idx])
    }

    pub fn jobs(&self) -> &[JobVector] {
        &self.jobs
    }

    pub fn is_degenerate(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Project text onto the fitted vocabulary as a unit-length tf-idf vector.
    /// Terms outside the vocabulary are ignored.
    pub fn vectorize(&self, text: &str) -> SparseVector {
        let counts = self.tokenizer.analyze_with_frequencies(text);
        weigh(&counts, &self.vocabulary, &self.idf)
    }

    pub fn stats(&self) -> ModelStats {
        let total_entries: usize = self.jobs.iter().map(|j| j.vector.len()).sum();
        ModelStats {
            total_documents: self.jobs.len(),
            total_terms: self.vocabulary.len(),
            avg_terms_per_document: if self.jobs.is_empty() {
                0.0
            } else {
                total_entries as f64 / self.jobs.len() as f64
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelStats {
    pub total_documents: usize,
    pub total_terms: usize,
    pub avg_terms_per_document: f64,
}

/// Builds a [`FittedModel`] from the job catalog
#[derive(Debug, Clone, Default)]
pub struct CorpusIndexer {
    config: MatcherConfig,
}

impl CorpusIndexer {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::with_config(self.config.tokenizer.clone())
    }

    /// Fit vocabulary and idf weights on `job_texts`.
    ///
    /// `job_meta[i]` describes `job_texts[i]`; both slices must have the same,
    /// non-zero length.
    pub fn fit<S: AsRef<str>>(
        &self,
        job_texts: &[S],
        job_meta: &[JobMeta],
    ) -> Result<FittedModel, MatchError> {
        if job_texts.len() != job_meta.len() {
            return Err(MatchError::LengthMismatch {
                texts: job_texts.len(),
                meta: job_meta.len(),
            });
        }
        if job_texts.is_empty() {
            return Err(MatchError::EmptyCorpus);
        }

        let tokenizer = self.tokenizer();
        let counts: Vec<HashMap<String, usize>> = job_texts
            .iter()
            .map(|text| tokenizer.analyze_with_frequencies(text.as_ref()))
            .collect();

        // Document frequency per term
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let min_df = self.config.min_df.max(1);
        let kept: Vec<(&str, usize)> = doc_freq
            .into_iter()
            .filter(|&(_, df)| df >= min_df)
            .collect();

        if kept.is_empty() {
            return Err(MatchError::DegenerateVocabulary);
        }

        let n = job_texts.len() as f64;
        let idf: Vec<f64> = kept
            .iter()
            .map(|&(_, df)| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();
        let vocabulary = Vocabulary::from_sorted_terms(kept.iter().map(|&(t, _)| t.to_string()));

        let jobs = counts
            .iter()
            .zip(job_meta)
            .map(|(doc, meta)| JobVector {
                meta: meta.clone(),
                vector: weigh(doc, &vocabulary, &idf),
            })
            .collect();

        tracing::debug!(
            documents = job_texts.len(),
            terms = vocabulary.len(),
            min_df,
            "fitted job corpus"
        );

        Ok(FittedModel {
            tokenizer,
            vocabulary,
            idf,
            jobs,
        })
    }

    /// Fit on catalog postings, using each description as the job text
    pub fn fit_postings(&self, jobs: &[JobPosting]) -> Result<FittedModel, MatchError> {
        let (texts, meta) = split_postings(jobs);
        self.fit(&texts, &meta)
    }
}

/// Job descriptions and their metadata as the parallel slices `fit` takes
pub(crate) fn split_postings(jobs: &[JobPosting]) -> (Vec<&str>, Vec<JobMeta>) {
    jobs.iter()
        .map(|j| (j.description.as_str(), j.meta()))
        .unzip()
}

/// Raw term counts times idf, L2-normalized
fn weigh(counts: &HashMap<String, usize>, vocabulary: &Vocabulary, idf: &[f64]) -> SparseVector {
    let pairs = counts
        .iter()
        .filter_map(|(term, &count)| {
            vocabulary
                .index_of(term)
                .map(|idx| (idx, count as f64 * idf[idx]))
        })
        .collect();
    SparseVector::from_pairs(pairs).normalized()
}
