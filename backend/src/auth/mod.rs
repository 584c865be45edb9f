//! Authentication module
//!
//! Signed access/refresh tokens, a revocation ledger consulted on every
//! guarded request, and argon2 password hashing.

mod credentials;
mod error;
mod guard;
mod jwt;
mod ledger;
mod middleware;
mod password;

pub use credentials::{CredentialStore, InMemoryCredentialStore, UserRecord};
pub use error::AuthError;
pub use guard::{bearer_token, AuthGuard, Principal};
pub use jwt::{Claims, IssuedToken, JwtService, TokenKind};
pub use ledger::{InMemoryRevocationLedger, RevocationLedger};
pub use middleware::{AuthUser, EmployerUser, SeekerUser};
pub use password::PasswordService;
