//! Job posting routes

use crate::auth::EmployerUser;
use crate::error::ApiResult;
use crate::services::JobService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use jobboard_shared::types::{
    CreateJobRequest, DashboardEntry, JobCreatedResponse, JobQuery, JobResponse, JobSearchQuery,
    JobSearchResponse,
};

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/search", get(search_jobs))
        .route("/employer-dashboard", get(employer_dashboard))
}

/// GET /api/v1/jobs?title=&location=
async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> ApiResult<Json<Vec<JobResponse>>> {
    Ok(Json(JobService::list(state.db(), &query).await?))
}

/// POST /api/v1/jobs
async fn create_job(
    State(state): State<AppState>,
    EmployerUser(employer): EmployerUser,
    Json(req): Json<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<JobCreatedResponse>)> {
    let created = JobService::create(state.db(), employer.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/jobs/search?title=&location=&page=&per_page=
async fn search_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobSearchQuery>,
) -> ApiResult<Json<JobSearchResponse>> {
    Ok(Json(JobService::search(state.db(), &query).await?))
}

/// GET /api/v1/jobs/employer-dashboard
async fn employer_dashboard(
    State(state): State<AppState>,
    EmployerUser(employer): EmployerUser,
) -> ApiResult<Json<Vec<DashboardEntry>>> {
    Ok(Json(JobService::dashboard(state.db(), employer.user_id).await?))
}
