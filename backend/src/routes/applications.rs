//! Application routes
//!
//! Seekers apply and track their applications; employers review the
//! applicants of their own jobs.

use crate::auth::{AuthUser, EmployerUser, SeekerUser};
use crate::error::ApiResult;
use crate::services::{ApplicationService, ResumeFile};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use jobboard_shared::types::{Applicant, MessageResponse, MyApplication, UpdateStatusRequest};
use uuid::Uuid;

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/apply/:job_id", post(apply))
        .route("/my-applications", get(my_applications))
        .route("/download-resume/:user_id", get(download_resume))
        .route("/job/:job_id/applicants", get(job_applicants))
        .route("/update-status/:app_id", put(update_status))
}

/// POST /api/v1/applications/apply/:job_id
async fn apply(
    State(state): State<AppState>,
    SeekerUser(seeker): SeekerUser,
    Path(job_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let msg = ApplicationService::apply(state.db(), seeker.user_id, job_id).await?;
    Ok((StatusCode::CREATED, Json(msg)))
}

/// GET /api/v1/applications/my-applications
async fn my_applications(
    State(state): State<AppState>,
    SeekerUser(seeker): SeekerUser,
) -> ApiResult<Json<Vec<MyApplication>>> {
    Ok(Json(ApplicationService::my_applications(state.db(), seeker.user_id).await?))
}

/// GET /api/v1/applications/download-resume/:user_id
async fn download_resume(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<ResumeFile> {
    ApplicationService::download_resume(state.db(), state.files(), &caller, user_id).await
}

/// GET /api/v1/applications/job/:job_id/applicants
async fn job_applicants(
    State(state): State<AppState>,
    EmployerUser(employer): EmployerUser,
    Path(job_id): Path<i64>,
) -> ApiResult<Json<Vec<Applicant>>> {
    Ok(Json(
        ApplicationService::job_applicants(state.db(), employer.user_id, job_id).await?,
    ))
}

/// PUT /api/v1/applications/update-status/:app_id
async fn update_status(
    State(state): State<AppState>,
    EmployerUser(employer): EmployerUser,
    Path(app_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let msg = ApplicationService::update_status(state.db(), employer.user_id, app_id, &req.status).await?;
    Ok(Json(msg))
}
