//! Job application repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use jobboard_shared::ApplicationStatus;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplicationRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub job_id: i64,
    pub status: String,
    pub applied_on: DateTime<Utc>,
}

/// A seeker's application with the job title attached
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SeekerApplicationRow {
    pub application_id: i64,
    pub job_title: String,
    pub status: String,
    pub applied_on: DateTime<Utc>,
}

/// An application on an employer's job with the applicant attached
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplicantRow {
    pub application_id: i64,
    pub seeker_id: Uuid,
    pub seeker_email: String,
    pub resume_path: Option<String>,
    pub status: String,
    pub applied_on: DateTime<Utc>,
}

pub struct ApplicationRepository;

impl ApplicationRepository {
    /// Submit an application; `None` if the seeker already applied
    pub async fn create(pool: &PgPool, user_id: Uuid, job_id: i64) -> Result<Option<ApplicationRecord>> {
        let record = sqlx::query_as::<_, ApplicationRecord>(
            r#"
            INSERT INTO applications (user_id, job_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, job_id) DO NOTHING
            RETURNING id, user_id, job_id, status, applied_on
            "#,
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn list_for_seeker(pool: &PgPool, user_id: Uuid) -> Result<Vec<SeekerApplicationRow>> {
        let rows = sqlx::query_as::<_, SeekerApplicationRow>(
            r#"
            SELECT a.id AS application_id, j.title AS job_title, a.status, a.applied_on
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.user_id = $1
            ORDER BY a.applied_on DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_for_job(pool: &PgPool, job_id: i64) -> Result<Vec<ApplicantRow>> {
        let rows = sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT a.id AS application_id,
                   u.id AS seeker_id,
                   u.email AS seeker_email,
                   u.resume_path,
                   a.status,
                   a.applied_on
            FROM applications a
            JOIN users u ON u.id = a.user_id
            WHERE a.job_id = $1
            ORDER BY a.applied_on ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Change the status of an application on one of `employer_id`'s jobs
    ///
    /// Returns `false` when no such application exists for that employer.
    pub async fn update_status_owned(
        pool: &PgPool,
        application_id: i64,
        employer_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE applications a
            SET status = $3
            FROM jobs j
            WHERE a.job_id = j.id
              AND a.id = $1
              AND j.employer_id = $2
            "#,
        )
        .bind(application_id)
        .bind(employer_id)
        .bind(status.as_str())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the seeker applied to any job posted by the employer
    pub async fn seeker_applied_to_employer(pool: &PgPool, seeker_id: Uuid, employer_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM applications a
                JOIN jobs j ON j.id = a.job_id
                WHERE a.user_id = $1 AND j.employer_id = $2
            )
            "#,
        )
        .bind(seeker_id)
        .bind(employer_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}
