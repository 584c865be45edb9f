//! Job Board Shared Library
//!
//! Request/response types, domain enums and input validation used by the
//! backend and by API clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

pub use errors::*;
pub use models::{ApplicationStatus, Role};
pub use types::*;
