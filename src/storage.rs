use crate::document::{JobPosting, Resume};
use crate::error::ResumeNotFound;
use anyhow::{Context, Result};
use sled::Db;
use std::path::Path;

const RESUMES_TREE: &str = "resumes";
const JOBS_TREE: &str = "jobs";
const COUNTERS_TREE: &str = "counters";

/// Postings inserted into an empty catalog
pub fn default_jobs() -> Vec<JobPosting> {
    vec![
        JobPosting::new("Python Developer", "Python Flask SQL", "python flask sql"),
        JobPosting::new("Data Analyst", "Python Pandas Data", "python pandas data"),
        JobPosting::new("ML Engineer", "Machine Learning Python", "python machine learning"),
    ]
}

/// Persistence for resumes and the job catalog.
///
/// Keys are big-endian ids from a per-tree counter starting at 1, so iterating
/// a tree yields records in insertion order.
pub struct Storage {
    db: Db,
}

impl Storage {
    /// Open or create a storage database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path).context("Failed to open database")?;
        Ok(Self { db })
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let config = sled::Config::new().temporary(true);
        let db = config.open().context("Failed to create in-memory database")?;
        Ok(Self { db })
    }

    /// Atomically bump the counter for `tree` and return the new value
    fn next_id(&self, tree: &str) -> Result<u64> {
        let counters = self.db.open_tree(COUNTERS_TREE)?;
        let value = counters.update_and_fetch(tree, |old| {
            let current = old
                .and_then(|bytes| <[u8; 8]>::try_from(bytes).ok())
                .map(u64::from_be_bytes)
                .unwrap_or(0);
            Some((current + 1).to_be_bytes().to_vec())
        })?;

        value
            .and_then(|bytes| <[u8; 8]>::try_from(bytes.as_ref()).ok())
            .map(u64::from_be_bytes)
            .context("Corrupt id counter")
    }

    // ========== Job Operations ==========

    /// Insert the default postings if the catalog is empty. Returns how many were added.
    pub fn seed_default_jobs(&self) -> Result<usize> {
        if self.count_jobs()? > 0 {
            return Ok(0);
        }

        let jobs = default_jobs();
        for job in &jobs {
            self.add_job(job)?;
        }
        tracing::info!(count = jobs.len(), "seeded default job catalog");
        Ok(jobs.len())
    }

    /// Append a posting to the catalog
    pub fn add_job(&self, job: &JobPosting) -> Result<u64> {
        let tree = self.db.open_tree(JOBS_TREE)?;
        let id = self.next_id(JOBS_TREE)?;
        let serialized = bincode::serialize(job)?;
        tree.insert(id.to_be_bytes(), serialized)?;
        Ok(id)
    }

    /// All postings in insertion order
    pub fn all_jobs(&self) -> Result<Vec<JobPosting>> {
        let tree = self.db.open_tree(JOBS_TREE)?;
        let mut jobs = Vec::new();

        for item in tree.iter() {
            let (_, value) = item?;
            let job: JobPosting = bincode::deserialize(&value).context("Corrupt job record")?;
            jobs.push(job);
        }

        Ok(jobs)
    }

    pub fn count_jobs(&self) -> Result<usize> {
        let tree = self.db.open_tree(JOBS_TREE)?;
        Ok(tree.len())
    }

    // ========== Resume Operations ==========

    /// Allocate the id of a resume that is about to be stored
    pub fn reserve_resume_id(&self) -> Result<u64> {
        self.next_id(RESUMES_TREE)
    }

    /// Store a new resume and return its id
    pub fn save_resume(&self, filename: &str, text: &str) -> Result<u64> {
        let id = self.reserve_resume_id()?;
        self.store_resume(id, filename, text)?;
        Ok(id)
    }

    /// Store a resume under an id from [`Storage::reserve_resume_id`]
    pub fn store_resume(&self, id: u64, filename: &str, text: &str) -> Result<()> {
        let resume = Resume::new(id, filename.to_string(), text.to_string());
        self.put_resume(&resume)
    }

    fn put_resume(&self, resume: &Resume) -> Result<()> {
        let tree = self.db.open_tree(RESUMES_TREE)?;
        let serialized = bincode::serialize(resume)?;
        tree.insert(resume.id.to_be_bytes(), serialized)?;
        Ok(())
    }

    /// Get a resume by ID
    pub fn get_resume(&self, id: u64) -> Result<Option<Resume>> {
        let tree = self.db.open_tree(RESUMES_TREE)?;
        if let Some(data) = tree.get(id.to_be_bytes())? {
            let resume: Resume = bincode::deserialize(&data).context("Corrupt resume record")?;
            Ok(Some(resume))
        } else {
            Ok(None)
        }
    }

    /// Record the outcome of scoring a resume
    pub fn record_score(&self, id: u64, ats_score: f64, best_job: &str) -> Result<()> {
        let mut resume = self.get_resume(id)?.ok_or(ResumeNotFound(id))?;
        resume.ats_score = Some(ats_score);
        resume.best_job = Some(best_job.to_string());
        self.put_resume(&resume)
    }

    /// All resumes in upload order
    pub fn all_resumes(&self) -> Result<Vec<Resume>> {
        let tree = self.db.open_tree(RESUMES_TREE)?;
        let mut resumes = Vec::new();

        for item in tree.iter() {
            let (_, value) = item?;
            resumes.push(bincode::deserialize(&value).context("Corrupt resume record")?);
        }

        Ok(resumes)
    }

    /// Flush all changes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Clear all data
    pub fn clear(&self) -> Result<()> {
        self.db.drop_tree(RESUMES_TREE)?;
        self.db.drop_tree(JOBS_TREE)?;
        self.db.drop_tree(COUNTERS_TREE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_only_once() -> Result<()> {
        let storage = Storage::in_memory()?;

        assert_eq!(storage.seed_default_jobs()?, 3);
        assert_eq!(storage.seed_default_jobs()?, 0);
        assert_eq!(storage.count_jobs()?, 3);

        Ok(())
    }

    #[test]
    fn test_jobs_keep_insertion_order() -> Result<()> {
        let storage = Storage::in_memory()?;
        storage.seed_default_jobs()?;
        storage.add_job(&JobPosting::new("Rust Developer", "Rust Tokio", "rust"))?;

        let titles: Vec<String> = storage.all_jobs()?.into_iter().map(|j| j.title).collect();
        assert_eq!(
            titles,
            vec!["Python Developer", "Data Analyst", "ML Engineer", "Rust Developer"]
        );

        Ok(())
    }

    #[test]
    fn test_resume_roundtrip_and_score() -> Result<()> {
        let storage = Storage::in_memory()?;
        let id = storage.save_resume("cv.txt", "python flask")?;

        let resume = storage.get_resume(id)?.unwrap();
        assert_eq!(resume.filename, "cv.txt");
        assert!(resume.ats_score.is_none());

        storage.record_score(id, 87.5, "Python Developer")?;
        let resume = storage.get_resume(id)?.unwrap();
        assert_eq!(resume.ats_score, Some(87.5));
        assert_eq!(resume.best_job.as_deref(), Some("Python Developer"));
        assert_eq!(storage.all_resumes()?.len(), 1);

        Ok(())
    }

    #[test]
    fn test_record_score_unknown_resume() -> Result<()> {
        let storage = Storage::in_memory()?;
        let err = storage.record_score(42, 10.0, "x").unwrap_err();
        assert!(err.downcast_ref::<ResumeNotFound>().is_some());
        Ok(())
    }

    #[test]
    fn test_ids_are_counted_per_tree() -> Result<()> {
        let storage = Storage::in_memory()?;
        storage.seed_default_jobs()?;

        assert_eq!(storage.save_resume("a.txt", "python")?, 1);
        assert_eq!(storage.save_resume("b.txt", "sql")?, 2);
        assert_eq!(
            storage.add_job(&JobPosting::new("Rust Developer", "Rust Tokio", "rust"))?,
            4
        );

        Ok(())
    }

    #[test]
    fn test_clear() -> Result<()> {
        let storage = Storage::in_memory()?;
        storage.seed_default_jobs()?;
        storage.save_resume("cv.txt", "text")?;
        storage.clear()?;

        assert_eq!(storage.count_jobs()?, 0);
        assert!(storage.all_resumes()?.is_empty());
        assert_eq!(storage.save_resume("cv.txt", "text")?, 1);
        Ok(())
    }
}
