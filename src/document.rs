use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A job posting as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub skills: String,
}

impl JobPosting {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        skills: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            skills: skills.into(),
        }
    }

    pub fn meta(&self) -> JobMeta {
        JobMeta {
            title: self.title.clone(),
            skills: self.skills.clone(),
        }
    }
}

/// Per-job metadata carried alongside the job text during a fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMeta {
    pub title: String,
    #[serde(default)]
    pub skills: String,
}

impl JobMeta {
    pub fn new(title: impl Into<String>, skills: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            skills: skills.into(),
        }
    }
}

/// An uploaded resume and the outcome of its last scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: u64,
    pub filename: String,
    pub text: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub ats_score: Option<f64>,
    #[serde(default)]
    pub best_job: Option<String>,
}

impl Resume {
    pub fn new(id: u64, filename: String, text: String) -> Self {
        Self {
            id,
            filename,
            text,
            uploaded_at: Utc::now(),
            ats_score: None,
            best_job: None,
        }
    }
}
