use atsmatch::{best_match, CorpusIndexer, JobMatcher, JobMeta, MatcherConfig, Ranker, TokenizerConfig};

fn main() -> anyhow::Result<()> {
    println!("=== atsmatch Basic Usage Example ===\n");

    let job_texts = [
        "Python Flask SQL",
        "Python Pandas Data",
        "Machine Learning Python",
    ];
    let job_meta = [
        JobMeta::new("Python Developer", "python flask sql"),
        JobMeta::new("Data Analyst", "python pandas data"),
        JobMeta::new("ML Engineer", "python machine learning"),
    ];

    // Example 1: fit and match through the request-scoped matcher
    println!("--- Example 1: Match a resume ---");
    let mut matcher = JobMatcher::default();
    matcher.fit(&job_texts, &job_meta)?;

    let resume = "Experienced Python Flask developer with SQL skills";
    let results = matcher.match_resume(resume)?;
    for result in &results {
        println!("  {:>6.2}  {}", result.score, result.job);
    }
    if let Some(best) = best_match(&results) {
        println!("Best match: {} (ATS {:.2})", best.job, best.ats);
    }

    // Example 2: an empty resume scores zero everywhere, first job wins the tie
    println!("\n--- Example 2: Empty resume ---");
    let results = matcher.match_resume("")?;
    println!(
        "Scores: {:?}, best: {}",
        results.iter().map(|r| r.score).collect::<Vec<_>>(),
        best_match(&results).map(|b| b.job.as_str()).unwrap_or("none"),
    );

    // Example 3: work with the fitted model directly
    println!("\n--- Example 3: Inspect the fitted model ---");
    let config = MatcherConfig {
        tokenizer: TokenizerConfig {
            remove_stopwords: true,
            stem: true,
            ..TokenizerConfig::default()
        },
        ..MatcherConfig::default()
    };
    let model = CorpusIndexer::new(config).fit(&job_texts, &job_meta)?;
    println!("Vocabulary: {:?}", model.vocabulary().terms());
    for term in ["python", "learn"] {
        if let Some(idf) = model.idf_of(term) {
            println!("  idf({}) = {:.4}", term, idf);
        }
    }

    let similarities = Ranker::new(&model).similarities("I have been learning machine learning");
    println!("Raw similarities: {:?}", similarities);

    println!("\n=== Example Complete ===");

    Ok(())
}
