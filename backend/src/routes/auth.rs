//! Authentication routes
//!
//! Register, login, refresh, logout and the caller's own profile. Refresh
//! and logout take the raw bearer token themselves since each needs a
//! specific token kind.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use jobboard_shared::types::{
    LoginRequest, LoginResponse, MessageResponse, RefreshResponse, RegisterRequest, UserProfile,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", delete(logout))
        .route("/me", get(me))
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    state
        .sessions()
        .register(&req.email, &req.password, req.role)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let tokens = state.sessions().login(&req.email, &req.password).await?;
    Ok(Json(tokens))
}

/// POST /api/v1/auth/refresh
///
/// Expects the refresh token as the bearer credential.
async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<RefreshResponse>> {
    let raw = state.sessions().guard().bearer(authorization(&headers))?;
    let tokens = state.sessions().refresh(raw).await?;
    Ok(Json(tokens))
}

/// DELETE /api/v1/auth/logout
///
/// Revokes the presented access token. Refresh tokens are left alone.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<MessageResponse>> {
    let raw = state.sessions().guard().bearer(authorization(&headers))?;
    state.sessions().logout(raw).await?;
    Ok(Json(MessageResponse::new("Successfully logged out")))
}

/// GET /api/v1/auth/me
async fn me(State(state): State<AppState>, auth_user: AuthUser) -> ApiResult<Json<UserProfile>> {
    let user = state
        .sessions()
        .users()
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserProfile {
        id: user.id,
        email: user.email,
        role: user.role,
        has_resume: user.resume_path.is_some(),
        created_at: user.created_at,
    }))
}
