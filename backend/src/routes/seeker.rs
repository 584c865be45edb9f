//! Seeker resume routes

use crate::auth::SeekerUser;
use crate::error::{ApiError, ApiResult};
use crate::services::{ResumeFile, ResumeService};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use jobboard_shared::types::{MessageResponse, ResumeUploadResponse};

/// Multipart field carrying the resume
const RESUME_FIELD: &str = "resume";

pub fn seeker_routes() -> Router<AppState> {
    Router::new()
        .route("/upload-resume", post(upload_resume))
        .route("/delete-resume", delete(delete_resume))
        .route("/download-my-resume", get(download_my_resume))
}

impl IntoResponse for ResumeFile {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.filename);
        (
            [
                (header::CONTENT_TYPE, self.content_type().to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// POST /api/v1/seeker/upload-resume
async fn upload_resume(
    State(state): State<AppState>,
    SeekerUser(seeker): SeekerUser,
    mut multipart: Multipart,
) -> ApiResult<Json<ResumeUploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        let stored = ResumeService::upload(state.db(), state.files(), seeker.user_id, &filename, &bytes).await?;
        return Ok(Json(stored));
    }

    Err(ApiError::BadRequest("No file part".to_string()))
}

/// DELETE /api/v1/seeker/delete-resume
async fn delete_resume(
    State(state): State<AppState>,
    SeekerUser(seeker): SeekerUser,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(ResumeService::delete(state.db(), state.files(), seeker.user_id).await?))
}

/// GET /api/v1/seeker/download-my-resume
async fn download_my_resume(
    State(state): State<AppState>,
    SeekerUser(seeker): SeekerUser,
) -> ApiResult<ResumeFile> {
    ResumeService::download_own(state.db(), state.files(), seeker.user_id).await
}
