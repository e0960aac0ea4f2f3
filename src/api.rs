use crate::document::JobPosting;
use crate::engine::{Scorecard, ScoringEngine};
use crate::error::{MatchError, ResumeNotFound};
use crate::index::ModelStats;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// Kept loose so a missing or non-string value can be reported as invalid input
    #[serde(default)]
    pub resume_text: Value,
}

#[derive(Debug, Deserialize)]
pub struct AddJobRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub skills: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: u64,
}

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobPosting>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(e) = self.0.downcast_ref::<MatchError>() {
            return match e {
                MatchError::InvalidInput(_) | MatchError::LengthMismatch { .. } => {
                    StatusCode::BAD_REQUEST
                }
                MatchError::EmptyCorpus | MatchError::DegenerateVocabulary => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                MatchError::NotFitted => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        if self.0.downcast_ref::<ResumeNotFound>().is_some() {
            return StatusCode::NOT_FOUND;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = format!("{:#}", self.0);
        if status.is_server_error() {
            tracing::error!("API error: {}", message);
        } else {
            tracing::debug!("rejected request: {}", message);
        }

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn invalid(message: &str) -> AppError {
    AppError(MatchError::InvalidInput(message.to_string()).into())
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn upload_resume(
    State(engine): State<Arc<ScoringEngine>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid(&e.body_text()))?
    {
        if field.name() != Some("resume") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(invalid("no file selected"));
        }
        let bytes = field.bytes().await.map_err(|e| invalid(&e.body_text()))?;

        let id = engine.upload(&filename, &bytes)?;
        return Ok((StatusCode::CREATED, Json(ApiResponse::success(UploadResponse { id }))));
    }

    Err(invalid("missing 'resume' file field"))
}

async fn get_results(
    State(engine): State<Arc<ScoringEngine>>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<Scorecard>>, AppError> {
    let scorecard = engine.results(id)?;
    Ok(Json(ApiResponse::success(scorecard)))
}

async fn match_text(
    State(engine): State<Arc<ScoringEngine>>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<ApiResponse<Scorecard>>, AppError> {
    let text = req
        .resume_text
        .as_str()
        .ok_or_else(|| invalid("resume_text must be a string"))?;

    let scorecard = engine.score_text(text)?;
    Ok(Json(ApiResponse::success(scorecard)))
}

async fn list_jobs(
    State(engine): State<Arc<ScoringEngine>>,
) -> Result<Json<ApiResponse<JobsResponse>>, AppError> {
    let jobs = engine.jobs()?;
    let total = jobs.len();
    Ok(Json(ApiResponse::success(JobsResponse { jobs, total })))
}

async fn add_job(
    State(engine): State<Arc<ScoringEngine>>,
    Json(req): Json<AddJobRequest>,
) -> Result<impl IntoResponse, AppError> {
    let job = JobPosting::new(req.title, req.description, req.skills);
    let id = engine.add_job(&job)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(id))))
}

async fn get_stats(
    State(engine): State<Arc<ScoringEngine>>,
) -> Result<Json<ApiResponse<Option<ModelStats>>>, AppError> {
    let stats = engine.stats()?;
    Ok(Json(ApiResponse::success(stats)))
}

// ========== Router ==========

pub fn create_router(engine: Arc<ScoringEngine>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/upload", post(upload_resume))
        .route("/results/:id", get(get_results))
        .route("/match", post(match_text))
        .route("/jobs", get(list_jobs).post(add_job))
        .route("/stats", get(get_stats))
        .with_state(engine)
}
