use crate::index::FittedModel;
use serde::{Deserialize, Serialize};

/// Score of one job against one resume.
///
/// `score` and `ats` are percentages in `[0, 100]` rounded to two decimals.
/// They are currently identical; `ats` is kept separate so it can later
/// account for things like skill overlap without changing `score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job: String,
    pub score: f64,
    pub ats: f64,
}

impl MatchResult {
    pub fn new(job: String, similarity: f64) -> Self {
        let pct = to_percentage(similarity);
        Self {
            job,
            score: pct,
            ats: pct,
        }
    }
}

/// Cosine-similarity ranker over a fitted model
pub struct Ranker<'m> {
    model: &'m FittedModel,
}

impl<'m> Ranker<'m> {
    pub fn new(model: &'m FittedModel) -> Self {
        Self { model }
    }

    /// Cosine similarity of the resume against every job, in job order.
    ///
    /// Both sides are unit vectors so the dot product is the cosine. A resume
    /// sharing no terms with the vocabulary scores 0 everywhere.
    pub fn similarities(&self, resume_text: &str) -> Vec<f64> {
        let resume = self.model.vectorize(resume_text);
        let jobs = self.model.jobs();

        if resume.is_zero() {
            return vec![0.0; jobs.len()];
        }

        jobs.iter()
            .map(|job| resume.dot(&job.vector).clamp(0.0, 1.0))
            .collect()
    }

    /// One result per job, in the order the jobs were fitted
    pub fn match_resume(&self, resume_text: &str) -> Vec<MatchResult> {
        self.model
            .jobs()
            .iter()
            .zip(self.similarities(resume_text))
            .map(|(job, sim)| MatchResult::new(job.meta.title.clone(), sim))
            .collect()
    }
}

/// Similarity in `[0, 1]` to a percentage rounded to two decimals
pub fn to_percentage(similarity: f64) -> f64 {
    if !similarity.is_finite() {
        return 0.0;
    }
    (similarity.clamp(0.0, 1.0) * 100.0 * 100.0).round() / 100.0
}

/// Highest scoring result. Ties go to the earliest result.
pub fn best_match(results: &[MatchResult]) -> Option<&MatchResult> {
    results.iter().fold(None, |best, candidate| match best {
        Some(current) if current.score >= candidate.score => Some(current),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::JobMeta;
    use crate::index::CorpusIndexer;

    fn fit(jobs: &[(&str, &str)]) -> FittedModel {
        let texts: Vec<&str> = jobs.iter().map(|(_, text)| *text).collect();
        let meta: Vec<JobMeta> = jobs.iter().map(|(title, _)| JobMeta::new(*title, "")).collect();
        CorpusIndexer::default().fit(&texts, &meta).unwrap()
    }

    fn catalog() -> FittedModel {
        fit(&[
            ("Python Developer", "python flask sql"),
            ("Data Analyst", "python pandas data"),
            ("ML Engineer", "python machine learning"),
        ])
    }

    #[test]
    fn test_python_developer_wins() {
        let model = catalog();
        let results = Ranker::new(&model).match_resume("experienced python flask developer with sql skills");

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].job, "Python Developer");
        assert_eq!(results[0].score, 100.0);
        assert!(results[0].score > results[1].score);
        assert!(results[0].score > results[2].score);
        // only "python" is shared: 1 / (1 + 2 * (ln 2 + 1)^2)
        assert!((results[1].score - 14.85).abs() < 0.011);
        assert_eq!(best_match(&results).unwrap().job, "Python Developer");
    }

    #[test]
    fn test_empty_resume_scores_zero_and_first_job_wins() {
        let model = catalog();
        let results = Ranker::new(&model).match_resume("");

        assert!(results.iter().all(|r| r.score == 0.0 && r.ats == 0.0));
        assert_eq!(best_match(&results).unwrap().job, "Python Developer");
    }

    #[test]
    fn test_no_shared_terms_scores_zero() {
        let model = catalog();
        let results = Ranker::new(&model).match_resume("carpentry woodwork joinery");

        for r in &results {
            assert_eq!(r.score, 0.0);
            assert!(!r.score.is_nan());
        }
    }

    #[test]
    fn test_results_keep_input_order() {
        let model = catalog();
        let results = Ranker::new(&model).match_resume("machine learning with pandas");
        let jobs: Vec<&str> = results.iter().map(|r| r.job.as_str()).collect();

        assert_eq!(jobs, vec!["Python Developer", "Data Analyst", "ML Engineer"]);
    }

    #[test]
    fn test_verbatim_description_is_strict_maximum() {
        let model = catalog();
        let results = Ranker::new(&model).match_resume("python pandas data");

        assert_eq!(results[1].score, 100.0);
        assert!(results[1].score > results[0].score);
        assert!(results[1].score > results[2].score);
    }

    #[test]
    fn test_scores_in_range_and_ats_matches_score() {
        let model = catalog();
        let texts = [
            "python python python",
            "sql and data and machine learning",
            "Python, Flask, SQL, Pandas, Data, Machine Learning",
            "???",
        ];
        for text in texts {
            for r in Ranker::new(&model).match_resume(text) {
                assert!((0.0..=100.0).contains(&r.score));
                assert_eq!(r.score, r.ats);
            }
        }
    }

    #[test]
    fn test_tie_goes_to_first_job() {
        let model = fit(&[
            ("Python Developer", "python web"),
            ("Rust Engineer", "rust systems"),
            ("Systems Programmer", "rust systems"),
        ]);
        let results = Ranker::new(&model).match_resume("rust");

        assert_eq!(results[1].score, results[2].score);
        assert!(results[1].score > 0.0);
        assert_eq!(best_match(&results).unwrap().job, "Rust Engineer");
    }

    #[test]
    fn test_deterministic_across_refits() {
        let resume = "senior python engineer, flask apis, pandas reporting";
        let first = Ranker::new(&catalog()).match_resume(resume);
        let second = Ranker::new(&catalog()).match_resume(resume);
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_model_scores_zero() {
        let indexer = CorpusIndexer::default();
        let model = FittedModel::degenerate(indexer.tokenizer(), &[JobMeta::new("Empty", "")]);
        let results = Ranker::new(&model).match_resume("python");

        assert_eq!(results, vec![MatchResult::new("Empty".to_string(), 0.0)]);
    }

    #[test]
    fn test_to_percentage() {
        assert_eq!(to_percentage(0.123456), 12.35);
        assert_eq!(to_percentage(1.0000000002), 100.0);
        assert_eq!(to_percentage(-0.5), 0.0);
        assert_eq!(to_percentage(f64::NAN), 0.0);
    }

    #[test]
    fn test_best_match_empty() {
        assert!(best_match(&[]).is_none());
    }
}
