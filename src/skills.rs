use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const DEFAULT_SKILLS: &[&str] = &[
    "python", "java", "javascript", "typescript", "rust", "go", "c++", "sql", "nosql",
    "flask", "django", "fastapi", "react", "node", "pandas", "numpy", "scikit-learn",
    "tensorflow", "pytorch", "machine learning", "deep learning", "data analysis",
    "statistics", "excel", "tableau", "power bi", "docker", "kubernetes", "aws", "azure",
    "gcp", "linux", "git", "rest", "graphql", "spark", "hadoop", "airflow", "nlp",
];

/// Built-in skill list, used when no skill file is configured
pub fn default_skills() -> Vec<String> {
    DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
}

/// Load a skill list: one skill per line, trimmed and lowercased, blank lines skipped
pub fn load_skills<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read skill list {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect())
}

/// Skills from `skills` that occur in `text`, case-insensitively, in list order.
///
/// This is a plain substring test: "go" matches inside "google".
pub fn extract_skills(text: &str, skills: &[String]) -> Vec<String> {
    let haystack = text.to_lowercase();
    let mut seen = HashSet::new();

    skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|s| !s.is_empty() && haystack.contains(s.as_str()))
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_in_list_order() {
        let found = extract_skills(
            "Built Flask services backed by SQL; some Python tooling.",
            &skills(&["python", "sql", "flask", "rust"]),
        );
        assert_eq!(found, vec!["python", "sql", "flask"]);
    }

    #[test]
    fn test_extract_multiword_and_duplicates() {
        let found = extract_skills(
            "Machine Learning engineer",
            &skills(&["machine learning", "Machine Learning", "java"]),
        );
        assert_eq!(found, vec!["machine learning"]);
    }

    #[test]
    fn test_extract_from_empty_text() {
        assert!(extract_skills("", &default_skills()).is_empty());
    }

    #[test]
    fn test_load_skills() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Python\n\n  SQL  \nMachine Learning").unwrap();

        let loaded = load_skills(file.path()).unwrap();
        assert_eq!(loaded, vec!["python", "sql", "machine learning"]);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_skills("/definitely/not/here.txt").is_err());
    }
}
