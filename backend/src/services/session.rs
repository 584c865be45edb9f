//! Session use cases: register, login, refresh, logout
//!
//! Access tokens cache the role at issuance; refresh re-reads it from the
//! credential store, so a role change is picked up within one refresh cycle.
//! Logout revokes only the presented access token.

use crate::auth::{AuthError, AuthGuard, CredentialStore, JwtService, PasswordService, RevocationLedger, TokenKind, UserRecord};
use crate::error::ApiError;
use chrono::Utc;
use jobboard_shared::types::{LoginResponse, RefreshResponse};
use jobboard_shared::validation::{validate_email, validate_password};
use jobboard_shared::Role;
use std::sync::Arc;
use tracing::{info, warn};

const TOKEN_TYPE: &str = "Bearer";

#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn CredentialStore>,
    ledger: Arc<dyn RevocationLedger>,
    guard: AuthGuard,
}

impl SessionService {
    pub fn new(jwt: JwtService, users: Arc<dyn CredentialStore>, ledger: Arc<dyn RevocationLedger>) -> Self {
        Self {
            guard: AuthGuard::new(jwt, ledger.clone()),
            users,
            ledger,
        }
    }

    pub fn guard(&self) -> &AuthGuard {
        &self.guard
    }

    pub fn users(&self) -> &dyn CredentialStore {
        self.users.as_ref()
    }

    pub fn ledger(&self) -> &Arc<dyn RevocationLedger> {
        &self.ledger
    }

    fn jwt(&self) -> &JwtService {
        self.guard.jwt()
    }

    /// Create an account
    pub async fn register(&self, email: &str, password: &str, role: Role) -> Result<UserRecord, ApiError> {
        let email = email.trim().to_lowercase();
        validate_email(&email).map_err(ApiError::Validation)?;
        validate_password(password).map_err(ApiError::Validation)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }

        let password_hash = PasswordService::hash_async(password.to_string()).await?;

        let user = self
            .users
            .insert(&email, &password_hash, role)
            .await?
            .ok_or_else(|| ApiError::Conflict("User already exists".to_string()))?;

        info!(user_id = %user.id, role = %user.role, "Registered account");
        Ok(user)
    }

    /// Exchange email and password for an access/refresh pair
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let email = email.trim().to_lowercase();
        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                PasswordService::verify_dummy(password.to_string()).await?;
                metrics::counter!("auth_logins_total", "outcome" => "failure").increment(1);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone()).await?;
        if !valid {
            metrics::counter!("auth_logins_total", "outcome" => "failure").increment(1);
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let access = self.jwt().issue_access(user.id, user.role, now)?;
        let refresh = self.jwt().issue_refresh(user.id, now)?;

        metrics::counter!("auth_logins_total", "outcome" => "success").increment(1);
        info!(user_id = %user.id, "Login succeeded");

        Ok(LoginResponse {
            access_token: access.token,
            refresh_token: refresh.token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.jwt().access_token_expiry_secs(),
            role: user.role,
        })
    }

    /// Mint a new access token from a refresh token
    ///
    /// The role comes from the credential store, never from the token.
    pub async fn refresh(&self, raw_refresh_token: &str) -> Result<RefreshResponse, AuthError> {
        let now = Utc::now();
        let principal = self
            .guard
            .authorize(raw_refresh_token, TokenKind::Refresh, None, now)
            .await?;

        let role = match self.users.role_of(principal.user_id).await? {
            Some(role) => role,
            None => {
                warn!(user_id = %principal.user_id, "Refresh for a deleted account");
                return Err(AuthError::PrincipalNotFound);
            }
        };

        let access = self.jwt().issue_access(principal.user_id, role, now)?;

        Ok(RefreshResponse {
            access_token: access.token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.jwt().access_token_expiry_secs(),
        })
    }

    /// Revoke the presented access token
    pub async fn logout(&self, raw_access_token: &str) -> Result<(), AuthError> {
        let now = Utc::now();
        let principal = self
            .guard
            .authorize(raw_access_token, TokenKind::Access, None, now)
            .await?;

        self.ledger.revoke(&principal.jti, now).await?;

        metrics::counter!("auth_tokens_revoked_total").increment(1);
        info!(user_id = %principal.user_id, jti = %principal.jti, "Access token revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{InMemoryCredentialStore, InMemoryRevocationLedger};
    use proptest::prelude::*;

    struct Fixture {
        sessions: SessionService,
        users: Arc<InMemoryCredentialStore>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryCredentialStore::new());
        let sessions = SessionService::new(
            JwtService::new("session-test-secret", 900, 2_592_000),
            users.clone(),
            Arc::new(InMemoryRevocationLedger::new()),
        );
        Fixture { sessions, users }
    }

    async fn access_check(sessions: &SessionService, token: &str) -> Result<crate::auth::Principal, AuthError> {
        sessions
            .guard()
            .authorize(token, TokenKind::Access, None, Utc::now())
            .await
    }

    #[tokio::test]
    async fn test_login_logout_refresh_scenario() {
        let f = fixture();
        let alice = f.sessions.register("alice@x.com", "pw-alice-1", Role::Seeker).await.unwrap();

        let tokens = f.sessions.login("alice@x.com", "pw-alice-1").await.unwrap();
        assert_eq!(tokens.role, Role::Seeker);
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 900);

        let principal = access_check(&f.sessions, &tokens.access_token).await.unwrap();
        assert_eq!(principal.user_id, alice.id);

        f.sessions.logout(&tokens.access_token).await.unwrap();
        assert!(matches!(
            access_check(&f.sessions, &tokens.access_token).await,
            Err(AuthError::TokenRevoked)
        ));

        let refreshed = f.sessions.refresh(&tokens.refresh_token).await.unwrap();
        let principal = access_check(&f.sessions, &refreshed.access_token).await.unwrap();
        assert_eq!(principal.user_id, alice.id);
        assert_eq!(principal.role, Some(Role::Seeker));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let f = fixture();
        f.sessions.register("bob@x.com", "correct-horse", Role::Employer).await.unwrap();

        assert!(matches!(
            f.sessions.login("bob@x.com", "wrong-horse").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_email_same_error() {
        let f = fixture();
        assert!(matches!(
            f.sessions.login("ghost@x.com", "whatever-pw").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_email_is_case_insensitive() {
        let f = fixture();
        f.sessions.register("Carol@X.com", "carol-pass", Role::Seeker).await.unwrap();
        assert!(f.sessions.login("carol@x.com", "carol-pass").await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_picks_up_role_change() {
        let f = fixture();
        let user = f.sessions.register("dan@x.com", "dan-password", Role::Seeker).await.unwrap();
        let tokens = f.sessions.login("dan@x.com", "dan-password").await.unwrap();

        f.users.set_role(user.id, Role::Employer).await;

        let refreshed = f.sessions.refresh(&tokens.refresh_token).await.unwrap();
        let principal = access_check(&f.sessions, &refreshed.access_token).await.unwrap();
        assert_eq!(principal.role, Some(Role::Employer));

        // The access token from login still carries the old role.
        let old = access_check(&f.sessions, &tokens.access_token).await.unwrap();
        assert_eq!(old.role, Some(Role::Seeker));
    }

    #[tokio::test]
    async fn test_refresh_for_deleted_account() {
        let f = fixture();
        let user = f.sessions.register("erin@x.com", "erin-password", Role::Seeker).await.unwrap();
        let tokens = f.sessions.login("erin@x.com", "erin-password").await.unwrap();

        f.users.remove(user.id).await;

        assert!(matches!(
            f.sessions.refresh(&tokens.refresh_token).await,
            Err(AuthError::PrincipalNotFound)
        ));
    }

    #[tokio::test]
    async fn test_token_kinds_not_interchangeable() {
        let f = fixture();
        f.sessions.register("fay@x.com", "fay-password", Role::Seeker).await.unwrap();
        let tokens = f.sessions.login("fay@x.com", "fay-password").await.unwrap();

        assert!(matches!(
            f.sessions.refresh(&tokens.access_token).await,
            Err(AuthError::WrongTokenKind)
        ));
        assert!(matches!(
            f.sessions.logout(&tokens.refresh_token).await,
            Err(AuthError::WrongTokenKind)
        ));
    }

    #[tokio::test]
    async fn test_logout_twice_fails_second_time() {
        let f = fixture();
        f.sessions.register("gil@x.com", "gil-password", Role::Seeker).await.unwrap();
        let tokens = f.sessions.login("gil@x.com", "gil-password").await.unwrap();

        f.sessions.logout(&tokens.access_token).await.unwrap();
        assert!(matches!(
            f.sessions.logout(&tokens.access_token).await,
            Err(AuthError::TokenRevoked)
        ));
        assert!(!f.sessions.ledger().is_revoked("nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_leaves_sibling_sessions_alone() {
        let f = fixture();
        f.sessions.register("hal@x.com", "hal-password", Role::Employer).await.unwrap();
        let first = f.sessions.login("hal@x.com", "hal-password").await.unwrap();
        let second = f.sessions.login("hal@x.com", "hal-password").await.unwrap();

        f.sessions.logout(&first.access_token).await.unwrap();

        assert!(access_check(&f.sessions, &second.access_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_register_validation_and_conflict() {
        let f = fixture();

        assert!(matches!(
            f.sessions.register("not-an-email", "long-enough", Role::Seeker).await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            f.sessions.register("ivy@x.com", "short", Role::Seeker).await,
            Err(ApiError::Validation(_))
        ));

        f.sessions.register("ivy@x.com", "long-enough", Role::Seeker).await.unwrap();
        assert!(matches!(
            f.sessions.register("ivy@x.com", "long-enough", Role::Employer).await,
            Err(ApiError::Conflict(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        /// Login succeeds iff the presented password is the registered one.
        #[test]
        fn prop_login_succeeds_iff_password_matches(
            password in "[a-zA-Z0-9]{8,16}",
            attempt in "[a-zA-Z0-9]{8,16}",
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let f = fixture();
                f.sessions.register("prop@x.com", &password, Role::Seeker).await.unwrap();

                let result = f.sessions.login("prop@x.com", &attempt).await;
                prop_assert_eq!(result.is_ok(), attempt == password);
                Ok(())
            })?;
        }
    }
}
