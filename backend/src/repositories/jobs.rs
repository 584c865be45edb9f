//! Job posting repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Job record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub employer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Search hit joined with the employer's email
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobSearchRow {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub employer_email: String,
}

/// Application counts for one of an employer's jobs
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DashboardRow {
    pub job_id: i64,
    pub title: String,
    pub location: String,
    pub total_applications: i64,
    pub pending_reviews: i64,
}

/// Turn a user filter into a case-insensitive substring pattern
///
/// LIKE wildcards in the input are escaped so they match literally. Blank
/// filters mean "no filter".
pub fn like_pattern(filter: Option<&str>) -> Option<String> {
    let filter = filter?.trim();
    if filter.is_empty() {
        return None;
    }
    let escaped = filter
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{}%", escaped))
}

pub struct JobRepository;

impl JobRepository {
    pub async fn create(
        pool: &PgPool,
        employer_id: Uuid,
        title: &str,
        description: &str,
        location: &str,
    ) -> Result<JobRecord> {
        let job = sqlx::query_as::<_, JobRecord>(
            r#"
            INSERT INTO jobs (title, description, location, employer_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, location, employer_id, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(employer_id)
        .fetch_one(pool)
        .await?;

        Ok(job)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<JobRecord>> {
        let job = sqlx::query_as::<_, JobRecord>(
            r#"
            SELECT id, title, description, location, employer_id, created_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(job)
    }

    /// Find a job only if `employer_id` posted it
    pub async fn find_owned(pool: &PgPool, id: i64, employer_id: Uuid) -> Result<Option<JobRecord>> {
        let job = sqlx::query_as::<_, JobRecord>(
            r#"
            SELECT id, title, description, location, employer_id, created_at
            FROM jobs
            WHERE id = $1 AND employer_id = $2
            "#,
        )
        .bind(id)
        .bind(employer_id)
        .fetch_optional(pool)
        .await?;

        Ok(job)
    }

    /// All jobs matching the optional title/location filters
    pub async fn list(pool: &PgPool, title: Option<&str>, location: Option<&str>) -> Result<Vec<JobRecord>> {
        let jobs = sqlx::query_as::<_, JobRecord>(
            r#"
            SELECT id, title, description, location, employer_id, created_at
            FROM jobs
            WHERE ($1::text IS NULL OR title ILIKE $1)
              AND ($2::text IS NULL OR location ILIKE $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(like_pattern(title))
        .bind(like_pattern(location))
        .fetch_all(pool)
        .await?;

        Ok(jobs)
    }

    /// One page of matching jobs
    pub async fn search(
        pool: &PgPool,
        title: Option<&str>,
        location: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JobSearchRow>> {
        let rows = sqlx::query_as::<_, JobSearchRow>(
            r#"
            SELECT j.id, j.title, j.location, u.email AS employer_email
            FROM jobs j
            JOIN users u ON u.id = j.employer_id
            WHERE ($1::text IS NULL OR j.title ILIKE $1)
              AND ($2::text IS NULL OR j.location ILIKE $2)
            ORDER BY j.created_at DESC, j.id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(like_pattern(title))
        .bind(like_pattern(location))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Number of jobs matching the filters
    pub async fn count(pool: &PgPool, title: Option<&str>, location: Option<&str>) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM jobs
            WHERE ($1::text IS NULL OR title ILIKE $1)
              AND ($2::text IS NULL OR location ILIKE $2)
            "#,
        )
        .bind(like_pattern(title))
        .bind(like_pattern(location))
        .fetch_one(pool)
        .await?;

        Ok(total)
    }

    pub async fn dashboard(pool: &PgPool, employer_id: Uuid) -> Result<Vec<DashboardRow>> {
        let rows = sqlx::query_as::<_, DashboardRow>(
            r#"
            SELECT j.id AS job_id,
                   j.title,
                   j.location,
                   COUNT(a.id) AS total_applications,
                   COUNT(a.id) FILTER (WHERE a.status = 'pending') AS pending_reviews
            FROM jobs j
            LEFT JOIN applications a ON a.job_id = j.id
            WHERE j.employer_id = $1
            GROUP BY j.id
            ORDER BY j.created_at DESC, j.id DESC
            "#,
        )
        .bind(employer_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
