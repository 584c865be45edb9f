//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ApplicationStatus, Role};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

// ============================================================================
// Accounts and sessions
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Tokens handed out at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub role: Role,
}

/// Fresh access token handed out by the refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Account profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub has_resume: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Jobs
// ============================================================================

/// Filters for the public job listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobQuery {
    pub title: Option<String>,
    pub location: Option<String>,
}

/// Filters and paging for job search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSearchQuery {
    pub title: Option<String>,
    pub location: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// New job posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// Acknowledgement of a new posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreatedResponse {
    pub msg: String,
    pub job_id: i64,
}

/// Job as shown in the public listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub employer_id: Uuid,
}

/// Job as shown in paginated search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSearchItem {
    pub id: i64,
    pub title: String,
    pub location: String,
    /// Employer email
    pub employer: String,
}

/// Page of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSearchResponse {
    pub jobs: Vec<JobSearchItem>,
    pub total_pages: u32,
    pub current_page: u32,
    pub total_jobs: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Per-job statistics for the employer dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardEntry {
    pub job_id: i64,
    pub title: String,
    pub location: String,
    pub total_applications: i64,
    pub pending_reviews: i64,
    pub applicants_url: String,
}

// ============================================================================
// Applications
// ============================================================================

/// Application as seen by the seeker who submitted it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyApplication {
    pub application_id: i64,
    pub job_title: String,
    pub status: ApplicationStatus,
    pub applied_on: DateTime<Utc>,
}

/// Application as seen by the employer who owns the job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Applicant {
    pub application_id: i64,
    pub seeker_email: String,
    pub seeker_id: Uuid,
    pub status: ApplicationStatus,
    pub resume_url: Option<String>,
    pub applied_on: DateTime<Utc>,
}

/// Status change request
///
/// The status is kept as raw text so that unknown values surface as a
/// validation error rather than a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Acknowledgement of a stored resume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeUploadResponse {
    pub msg: String,
    pub path: String,
}
