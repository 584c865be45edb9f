//! Job posting service

use crate::error::ApiError;
use crate::repositories::JobRepository;
use jobboard_shared::types::{
    CreateJobRequest, DashboardEntry, JobCreatedResponse, JobQuery, JobResponse, JobSearchItem,
    JobSearchQuery, JobSearchResponse,
};
use jobboard_shared::validation::{validate_job_description, validate_job_location, validate_job_title};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

const DEFAULT_LOCATION: &str = "Remote";
const DEFAULT_PER_PAGE: u32 = 10;
const MAX_PER_PAGE: u32 = 100;

/// Resolved paging window for a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    /// Page defaults to 1, per_page to 10 and is capped at 100
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn total_pages(&self, total: u64) -> u32 {
        total.div_ceil(u64::from(self.per_page)) as u32
    }
}

pub struct JobService;

impl JobService {
    pub async fn list(pool: &PgPool, query: &JobQuery) -> Result<Vec<JobResponse>, ApiError> {
        let jobs = JobRepository::list(pool, query.title.as_deref(), query.location.as_deref()).await?;

        Ok(jobs
            .into_iter()
            .map(|job| JobResponse {
                id: job.id,
                title: job.title,
                description: job.description,
                location: job.location,
                employer_id: job.employer_id,
            })
            .collect())
    }

    /// Paginated search; a page past the end comes back empty
    pub async fn search(pool: &PgPool, query: &JobSearchQuery) -> Result<JobSearchResponse, ApiError> {
        let page = Page::from_query(query.page, query.per_page);
        let title = query.title.as_deref();
        let location = query.location.as_deref();

        let total = JobRepository::count(pool, title, location).await?.max(0) as u64;
        let rows = JobRepository::search(pool, title, location, page.limit(), page.offset()).await?;
        let total_pages = page.total_pages(total);

        Ok(JobSearchResponse {
            jobs: rows
                .into_iter()
                .map(|row| JobSearchItem {
                    id: row.id,
                    title: row.title,
                    location: row.location,
                    employer: row.employer_email,
                })
                .collect(),
            total_pages,
            current_page: page.page,
            total_jobs: total,
            has_next: page.page < total_pages,
            has_prev: page.page > 1,
        })
    }

    pub async fn create(
        pool: &PgPool,
        employer_id: Uuid,
        req: &CreateJobRequest,
    ) -> Result<JobCreatedResponse, ApiError> {
        validate_job_title(&req.title).map_err(ApiError::Validation)?;
        validate_job_description(&req.description).map_err(ApiError::Validation)?;
        if let Some(location) = req.location.as_deref() {
            validate_job_location(location).map_err(ApiError::Validation)?;
        }

        let location = req
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOCATION);

        let job = JobRepository::create(pool, employer_id, req.title.trim(), &req.description, location).await?;
        info!(job_id = job.id, employer_id = %employer_id, "Job posted");

        Ok(JobCreatedResponse {
            msg: "Job posted successfully".to_string(),
            job_id: job.id,
        })
    }

    pub async fn dashboard(pool: &PgPool, employer_id: Uuid) -> Result<Vec<DashboardEntry>, ApiError> {
        let rows = JobRepository::dashboard(pool, employer_id).await?;

        Ok(rows
            .into_iter()
            .map(|row| DashboardEntry {
                applicants_url: format!("/api/v1/applications/job/{}/applicants", row.job_id),
                job_id: row.job_id,
                title: row.title,
                location: row.location,
                total_applications: row.total_applications,
                pending_reviews: row.pending_reviews,
            })
            .collect())
    }
}
