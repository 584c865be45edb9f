//! Job application service
//!
//! Ownership rules sit on top of the guard's `{user_id, role}`: employers
//! only see and change applications on their own jobs, and resumes are only
//! served to their owner or to an employer the seeker applied to.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{ApplicationRepository, JobRepository, UserRepository};
use crate::services::resume::ResumeFile;
use crate::storage::FileStore;
use anyhow::Context;
use jobboard_shared::types::{Applicant, MessageResponse, MyApplication};
use jobboard_shared::{ApplicationStatus, Role};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// Outcome of the role/identity part of a resume download check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeAccess {
    Allowed,
    /// Allowed only if the seeker applied to one of the caller's jobs
    IfApplied,
    Denied,
}

pub fn resume_access(caller_id: Uuid, caller_role: Role, seeker_id: Uuid) -> ResumeAccess {
    match caller_role {
        Role::Seeker if caller_id == seeker_id => ResumeAccess::Allowed,
        Role::Seeker => ResumeAccess::Denied,
        Role::Employer => ResumeAccess::IfApplied,
    }
}

fn parse_status(raw: &str) -> anyhow::Result<ApplicationStatus> {
    raw.parse::<ApplicationStatus>()
        .with_context(|| format!("stored application status '{}' is unreadable", raw))
}

pub fn resume_url(seeker_id: Uuid) -> String {
    format!("/api/v1/applications/download-resume/{}", seeker_id)
}

pub struct ApplicationService;

impl ApplicationService {
    pub async fn apply(pool: &PgPool, seeker_id: Uuid, job_id: i64) -> Result<MessageResponse, ApiError> {
        if JobRepository::find_by_id(pool, job_id).await?.is_none() {
            return Err(ApiError::NotFound("Job not found".to_string()));
        }

        let application = ApplicationRepository::create(pool, seeker_id, job_id)
            .await?
            .ok_or_else(|| ApiError::Conflict("You have already applied for this job".to_string()))?;

        info!(application_id = application.id, job_id, seeker_id = %seeker_id, "Application submitted");
        Ok(MessageResponse::new("Application submitted successfully"))
    }

    pub async fn my_applications(pool: &PgPool, seeker_id: Uuid) -> Result<Vec<MyApplication>, ApiError> {
        let rows = ApplicationRepository::list_for_seeker(pool, seeker_id).await?;

        rows.into_iter()
            .map(|row| -> Result<MyApplication, ApiError> {
                Ok(MyApplication {
                    application_id: row.application_id,
                    job_title: row.job_title,
                    status: parse_status(&row.status)?,
                    applied_on: row.applied_on,
                })
            })
            .collect()
    }

    pub async fn job_applicants(pool: &PgPool, employer_id: Uuid, job_id: i64) -> Result<Vec<Applicant>, ApiError> {
        if JobRepository::find_owned(pool, job_id, employer_id).await?.is_none() {
            return Err(ApiError::NotFound("Job not found".to_string()));
        }

        let rows = ApplicationRepository::list_for_job(pool, job_id).await?;

        rows.into_iter()
            .map(|row| -> Result<Applicant, ApiError> {
                Ok(Applicant {
                    application_id: row.application_id,
                    seeker_email: row.seeker_email,
                    seeker_id: row.seeker_id,
                    status: parse_status(&row.status)?,
                    resume_url: row.resume_path.as_ref().map(|_| resume_url(row.seeker_id)),
                    applied_on: row.applied_on,
                })
            })
            .collect()
    }

    pub async fn update_status(
        pool: &PgPool,
        employer_id: Uuid,
        application_id: i64,
        raw_status: &str,
    ) -> Result<MessageResponse, ApiError> {
        let status = raw_status
            .parse::<ApplicationStatus>()
            .map_err(|_| ApiError::Validation("Invalid status".to_string()))?;

        let updated = ApplicationRepository::update_status_owned(pool, application_id, employer_id, status).await?;
        if !updated {
            return Err(ApiError::NotFound("Application not found".to_string()));
        }

        info!(application_id, status = %status, "Application status updated");
        Ok(MessageResponse::new(format!("Application status updated to {}", status)))
    }

    pub async fn download_resume(
        pool: &PgPool,
        files: &dyn FileStore,
        caller: &AuthUser,
        seeker_id: Uuid,
    ) -> Result<ResumeFile, ApiError> {
        let seeker = UserRepository::find_by_id(pool, seeker_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let permitted = match resume_access(caller.user_id, caller.role, seeker_id) {
            ResumeAccess::Allowed => true,
            ResumeAccess::IfApplied => {
                ApplicationRepository::seeker_applied_to_employer(pool, seeker_id, caller.user_id).await?
            }
            ResumeAccess::Denied => false,
        };
        if !permitted {
            return Err(ApiError::Forbidden(
                "You do not have permission to view this resume".to_string(),
            ));
        }

        let path = seeker
            .resume_path
            .ok_or_else(|| ApiError::NotFound("Resume not found".to_string()))?;

        ResumeFile::load(files, &path).await
    }
}
