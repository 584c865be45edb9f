//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the auth core and file storage.

pub mod applications;
pub mod jobs;
pub mod resume;
pub mod session;

pub use applications::ApplicationService;
pub use jobs::{JobService, Page};
pub use resume::{ResumeFile, ResumeService};
pub use session::SessionService;
