//! Authentication extractors
//!
//! Each extractor runs the [`AuthGuard`](super::AuthGuard) against the
//! request's bearer token, requiring an access token and, for the role
//! variants, the matching role claim.

use super::{AuthError, TokenKind};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use jobboard_shared::Role;
use uuid::Uuid;

/// Authenticated caller holding a live access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
    pub jti: String,
}

/// Caller whose access token carries the employer role
#[derive(Debug, Clone)]
pub struct EmployerUser(pub AuthUser);

/// Caller whose access token carries the seeker role
#[derive(Debug, Clone)]
pub struct SeekerUser(pub AuthUser);

async fn authenticate(parts: &Parts, state: &AppState, role: Option<Role>) -> Result<AuthUser, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let principal = state
        .sessions()
        .guard()
        .authorize_header(header, TokenKind::Access, role, Utc::now())
        .await?;

    Ok(AuthUser {
        user_id: principal.user_id,
        role: principal.role.ok_or(AuthError::InvalidToken)?,
        jti: principal.jti,
    })
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts, &AppState::from_ref(state), None).await
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for EmployerUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts, &AppState::from_ref(state), Some(Role::Employer))
            .await
            .map(EmployerUser)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SeekerUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts, &AppState::from_ref(state), Some(Role::Seeker))
            .await
            .map(SeekerUser)
    }
}
