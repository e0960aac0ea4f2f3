use anyhow::{Context, Result};
use atsmatch::api::create_router;
use atsmatch::{best_match, AppConfig, JobMatcher, JobPosting, ScoringEngine, Scorecard};
use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Score resumes against a job catalog", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database directory
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory uploaded resumes are saved to
    #[arg(long, global = true)]
    uploads: Option<PathBuf>,

    /// Skill list file, one skill per line
    #[arg(long, global = true)]
    skills: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Rank a JSON list of jobs against a resume file without touching the database
    Match {
        /// JSON array of {"title", "description", "skills"}
        #[arg(short, long)]
        jobs: PathBuf,
        resume: PathBuf,
    },
    /// Store a resume file and print its id
    Upload { file: PathBuf },
    /// Score a stored resume
    Results { id: u64 },
    /// List the job catalog
    Jobs,
    /// Add a posting to the job catalog
    AddJob {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        skills: String,
    },
}

impl Args {
    fn app_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(uploads) = &self.uploads {
            config.upload_dir = uploads.clone();
        }
        if let Some(skills) = &self.skills {
            config.skills_path = Some(skills.clone());
        }
        Ok(config)
    }
}

fn load_jobs(path: &Path) -> Result<Vec<JobPosting>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse jobs from {}", path.display()))
}

fn print_scorecard(card: &Scorecard) {
    if card.results.is_empty() {
        println!("No jobs in the catalog, nothing to score.");
    }
    for result in &card.results {
        println!("{:>7.2}  {}", result.score, result.job);
    }
    println!();
    match (&card.best_job, card.ats_score) {
        (Some(job), Some(ats)) => println!("Best match: {} (ATS score {:.2})", job, ats),
        _ => println!("Best match: none"),
    }
    if !card.skills.is_empty() {
        println!("Skills: {}", card.skills.join(", "));
    }
}

async fn serve(config: AppConfig, addr: Option<String>) -> Result<()> {
    let addr = addr.unwrap_or_else(|| config.bind_addr.clone());
    let engine = Arc::new(ScoringEngine::new(config)?);

    let app = create_router(engine)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("atsmatch=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = args.app_config()?;

    match args.command {
        Command::Serve { addr } => serve(config, addr).await?,
        Command::Match { jobs, resume } => {
            let jobs = load_jobs(&jobs)?;
            let text = fs::read_to_string(&resume)
                .with_context(|| format!("Failed to read {}", resume.display()))?;

            let mut matcher = JobMatcher::new(config.matcher);
            matcher.fit_postings(&jobs)?;
            let results = matcher.match_resume(&text)?;

            println!("Matching {} against {} jobs", resume.display(), results.len());
            for result in &results {
                println!("{:>7.2}  {}", result.score, result.job);
            }
            if let Some(best) = best_match(&results) {
                println!("\nBest match: {} (ATS score {:.2})", best.job, best.ats);
            }
        }
        Command::Upload { file } => {
            let engine = ScoringEngine::new(config)?;
            let bytes = fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let id = engine.upload(&name, &bytes)?;
            println!("Stored resume {}", id);
        }
        Command::Results { id } => {
            let engine = ScoringEngine::new(config)?;
            print_scorecard(&engine.results(id)?);
        }
        Command::Jobs => {
            let engine = ScoringEngine::new(config)?;
            for job in engine.jobs()? {
                println!("{}\t{}\t[{}]", job.title, job.description, job.skills);
            }
        }
        Command::AddJob {
            title,
            description,
            skills,
        } => {
            let engine = ScoringEngine::new(config)?;
            let id = engine.add_job(&JobPosting::new(title, description, skills))?;
            println!("Added job {}", id);
        }
    }

    Ok(())
}
