use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Tokenizer options. The defaults reproduce plain lowercased word
/// tokenization with single-character tokens dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub min_token_len: usize,
    pub remove_stopwords: bool,
    pub stem: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            min_token_len: 2,
            remove_stopwords: false,
            stem: false,
        }
    }
}

/// Options for fitting the job corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum number of job documents a term must appear in to enter the vocabulary.
    pub min_df: usize,
    pub tokenizer: TokenizerConfig,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_df: 1,
            tokenizer: TokenizerConfig::default(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    /// Skill list file, one skill per line. Falls back to the built-in list.
    pub skills_path: Option<PathBuf>,
    pub bind_addr: String,
    pub matcher: MatcherConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("atsmatch.db"),
            upload_dir: PathBuf::from("uploads"),
            skills_path: None,
            bind_addr: "127.0.0.1:3000".to_string(),
            matcher: MatcherConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open config file {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.matcher.min_df == 0 {
            bail!("matcher.min_df must be at least 1");
        }
        if self.bind_addr.trim().is_empty() {
            bail!("bind_addr must not be empty");
        }
        Ok(())
    }
}
