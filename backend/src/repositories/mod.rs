//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod applications;
pub mod jobs;
pub mod revocation;
pub mod user;

pub use applications::{ApplicantRow, ApplicationRecord, ApplicationRepository, SeekerApplicationRow};
pub use jobs::{DashboardRow, JobRecord, JobRepository, JobSearchRow};
pub use revocation::PgRevocationLedger;
pub use user::{PgCredentialStore, UserRepository};
