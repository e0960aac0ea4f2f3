use crate::config::TokenizerConfig;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};

lazy_static::lazy_static! {
    // Runs of word characters; punctuation such as '.' and '\'' always splits
    static ref WORD_RE: Regex = Regex::new(r"(?u)\b\w+\b").expect("valid regex");

    static ref STOPWORDS: HashSet<&'static str> = {
        [
            "a", "about", "above", "after", "again", "against", "all", "am", "an",
            "and", "any", "are", "as", "at", "be", "because", "been", "before", "being",
            "below", "between", "both", "but", "by", "cannot", "could", "did", "do",
            "does", "doing", "down", "during", "each", "few", "for", "from", "further",
            "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
            "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
            "itself", "me", "more", "most", "my", "myself", "no", "nor", "not", "of",
            "off", "on", "once", "only", "or", "other", "ought", "our", "ours",
            "ourselves", "out", "over", "own", "same", "she", "should", "so", "some",
            "such", "than", "that", "the", "their", "theirs", "them", "themselves",
            "then", "there", "these", "they", "this", "those", "through", "to", "too",
            "under", "until", "up", "very", "was", "we", "were", "what", "when",
            "where", "which", "while", "who", "whom", "why", "with", "would", "you",
            "your", "yours", "yourself", "yourselves",
        ]
        .iter()
        .copied()
        .collect()
    };
}

/// Turns free text into normalized terms. Job descriptions and resumes must
/// go through the same instance configuration to land in the same vector space.
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Stemmer>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::with_config(TokenizerConfig::default())
    }

    pub fn with_config(config: TokenizerConfig) -> Self {
        let stemmer = config.stem.then(|| Stemmer::create(Algorithm::English));
        Self { config, stemmer }
    }

    /// Split text on anything that is not a word character
    fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
    }

    /// Lowercase and drop tokens below the minimum length
    fn normalize_filter(&self, tokens: Vec<&str>) -> Vec<String> {
        tokens
            .into_iter()
            .map(|t| t.to_lowercase())
            .filter(|t| t.chars().count() >= self.config.min_token_len)
            .collect()
    }

    /// Remove stopwords
    fn stopword_filter(&self, tokens: Vec<String>) -> Vec<String> {
        if !self.config.remove_stopwords {
            return tokens;
        }
        tokens
            .into_iter()
            .filter(|t| !STOPWORDS.contains(t.as_str()))
            .collect()
    }

    /// Apply stemming
    fn stemmer_filter(&self, tokens: Vec<String>) -> Vec<String> {
        match &self.stemmer {
            Some(stemmer) => tokens
                .into_iter()
                .map(|t| stemmer.stem(&t).into_owned())
                .collect(),
            None => tokens,
        }
    }

    /// Full analysis pipeline
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let tokens = self.normalize_filter(tokens);
        let tokens = self.stopword_filter(tokens);
        self.stemmer_filter(tokens)
    }

    /// Analyze and count term frequencies
    pub fn analyze_with_frequencies(&self, text: &str) -> HashMap<String, usize> {
        let mut frequencies = HashMap::new();
        for token in self.analyze(text) {
            *frequencies.entry(token).or_insert(0) += 1;
        }
        frequencies
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Hello, World! This is a test.");
        assert_eq!(tokens, vec!["Hello", "World", "This", "is", "a", "test"]);
    }

    #[test]
    fn test_default_analyze_lowercases_and_drops_short_tokens() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.analyze("Python, Flask & SQL in a C team");
        assert_eq!(tokens, vec!["python", "flask", "sql", "in", "team"]);
    }

    #[test]
    fn test_unicode_words() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.analyze("Développeur Größe naïve_bayes");
        assert_eq!(tokens, vec!["développeur", "größe", "naïve_bayes"]);
    }

    #[test]
    fn test_punctuation_splits_words() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.analyze("Node.js"), vec!["node", "js"]);
        assert_eq!(tokenizer.analyze("ASP.NET v1.2"), vec!["asp", "net", "v1"]);
        assert_eq!(tokenizer.analyze("don't"), vec!["don"]);
        assert_eq!(tokenizer.analyze("jane@example.com"), vec!["jane", "example", "com"]);
    }

    #[test]
    fn test_stopwords_and_stemming() {
        let tokenizer = Tokenizer::with_config(TokenizerConfig {
            remove_stopwords: true,
            stem: true,
            ..TokenizerConfig::default()
        });
        let tokens = tokenizer.analyze("The skills were building models");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"were".to_string()));
        assert!(tokens.contains(&"skill".to_string()));
        assert!(tokens.contains(&"build".to_string()));
        assert!(tokens.contains(&"model".to_string()));
    }

    #[test]
    fn test_frequencies() {
        let tokenizer = Tokenizer::new();
        let freqs = tokenizer.analyze_with_frequencies("sql SQL python");
        assert_eq!(freqs.get("sql"), Some(&2));
        assert_eq!(freqs.get("python"), Some(&1));
    }
}
