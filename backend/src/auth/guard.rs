//! Request-time authorization decision
//!
//! The guard runs, in order: signature/expiry/shape, token kind, revocation,
//! role. The revocation lookup happens on every call, which is what makes a
//! logout take effect before the token expires. Ledger failures deny.

use super::{AuthError, JwtService, RevocationLedger, TokenKind};
use chrono::{DateTime, Utc};
use jobboard_shared::Role;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// What a successfully checked token authorizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    /// Always set for access tokens, never for refresh tokens
    pub role: Option<Role>,
    pub jti: String,
    pub kind: TokenKind,
}

#[derive(Clone)]
pub struct AuthGuard {
    jwt: JwtService,
    ledger: Arc<dyn RevocationLedger>,
}

/// Pull the token out of an `Authorization: Bearer <token>` value
///
/// The scheme matches case-insensitively. A missing header, another scheme,
/// or an empty token all read as `InvalidToken`.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let (scheme, token) = header
        .and_then(|value| value.split_once(' '))
        .ok_or(AuthError::InvalidToken)?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("Bearer") || token.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(token)
}

impl AuthGuard {
    pub fn new(jwt: JwtService, ledger: Arc<dyn RevocationLedger>) -> Self {
        Self { jwt, ledger }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Decide whether `raw` currently authorizes a `required` operation
    pub async fn authorize(
        &self,
        raw: &str,
        required: TokenKind,
        required_role: Option<Role>,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError> {
        let outcome = self.check(raw, required, required_role, now).await;

        if let Err(err) = &outcome {
            match err {
                AuthError::Internal(e) => error!(error = %e, "Auth guard could not consult the ledger"),
                other => debug!(reason = other.reason(), kind = %required, "Auth guard denied request"),
            }
            metrics::counter!("auth_guard_denials_total", "reason" => err.reason()).increment(1);
        }

        outcome
    }

    /// Same as [`authorize`](Self::authorize), starting from the raw header value
    pub async fn authorize_header(
        &self,
        header: Option<&str>,
        required: TokenKind,
        required_role: Option<Role>,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError> {
        let token = self.bearer(header)?;
        self.authorize(token, required, required_role, now).await
    }

    /// [`bearer_token`], with a rejected header logged and counted like any
    /// other denial
    pub fn bearer<'h>(&self, header: Option<&'h str>) -> Result<&'h str, AuthError> {
        bearer_token(header).map_err(|err| {
            debug!(reason = err.reason(), "Missing or malformed bearer header");
            metrics::counter!("auth_guard_denials_total", "reason" => err.reason()).increment(1);
            err
        })
    }

    async fn check(
        &self,
        raw: &str,
        required: TokenKind,
        required_role: Option<Role>,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError> {
        let claims = self.jwt.verify(raw, now)?;

        if claims.kind != required {
            return Err(AuthError::WrongTokenKind);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        if claims.kind == TokenKind::Access && claims.role.is_none() {
            return Err(AuthError::InvalidToken);
        }

        if self.ledger.is_revoked(&claims.jti).await? {
            return Err(AuthError::TokenRevoked);
        }

        if let Some(role) = required_role {
            if claims.role != Some(role) {
                return Err(AuthError::Forbidden);
            }
        }

        Ok(Principal {
            user_id,
            role: claims.role,
            jti: claims.jti,
            kind: claims.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryRevocationLedger;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::Duration;
    use proptest::prelude::*;
    use rstest::rstest;

    struct UnreachableLedger;

    #[async_trait]
    impl RevocationLedger for UnreachableLedger {
        async fn revoke(&self, _jti: &str, _now: DateTime<Utc>) -> Result<()> {
            anyhow::bail!("connection refused")
        }

        async fn is_revoked(&self, _jti: &str) -> Result<bool> {
            anyhow::bail!("connection refused")
        }

        async fn purge_revoked_before(&self, _cutoff: DateTime<Utc>) -> Result<u64> {
            anyhow::bail!("connection refused")
        }
    }

    fn jwt() -> JwtService {
        JwtService::new("guard-test-secret", 900, 2_592_000)
    }

    fn guard_with(ledger: Arc<dyn RevocationLedger>) -> AuthGuard {
        AuthGuard::new(jwt(), ledger)
    }

    #[tokio::test]
    async fn test_fresh_access_token_allowed() {
        let guard = guard_with(Arc::new(InMemoryRevocationLedger::new()));
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let issued = guard.jwt().issue_access(user_id, Role::Seeker, now).unwrap();

        let principal = guard
            .authorize(&issued.token, TokenKind::Access, Some(Role::Seeker), now)
            .await
            .unwrap();

        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.role, Some(Role::Seeker));
        assert_eq!(principal.jti, issued.claims.jti);
    }

    #[tokio::test]
    async fn test_refresh_token_rejected_where_access_required() {
        let guard = guard_with(Arc::new(InMemoryRevocationLedger::new()));
        let now = Utc::now();
        let refresh = guard.jwt().issue_refresh(Uuid::new_v4(), now).unwrap();
        let access = guard.jwt().issue_access(Uuid::new_v4(), Role::Seeker, now).unwrap();

        assert!(matches!(
            guard.authorize(&refresh.token, TokenKind::Access, None, now).await,
            Err(AuthError::WrongTokenKind)
        ));
        assert!(matches!(
            guard.authorize(&access.token, TokenKind::Refresh, None, now).await,
            Err(AuthError::WrongTokenKind)
        ));
    }

    #[tokio::test]
    async fn test_revoked_token_denied_until_expiry() {
        let ledger = Arc::new(InMemoryRevocationLedger::new());
        let guard = guard_with(ledger.clone());
        let now = Utc::now();
        let issued = guard.jwt().issue_access(Uuid::new_v4(), Role::Employer, now).unwrap();

        ledger.revoke(&issued.claims.jti, now).await.unwrap();

        for offset in [0, 1, 450, 899] {
            let at = now + Duration::seconds(offset);
            assert!(matches!(
                guard.authorize(&issued.token, TokenKind::Access, None, at).await,
                Err(AuthError::TokenRevoked)
            ));
        }
    }

    #[tokio::test]
    async fn test_double_revoke_same_as_single() {
        let ledger = Arc::new(InMemoryRevocationLedger::new());
        let guard = guard_with(ledger.clone());
        let now = Utc::now();
        let issued = guard.jwt().issue_access(Uuid::new_v4(), Role::Seeker, now).unwrap();

        ledger.revoke(&issued.claims.jti, now).await.unwrap();
        ledger.revoke(&issued.claims.jti, now).await.unwrap();

        assert!(matches!(
            guard.authorize(&issued.token, TokenKind::Access, None, now).await,
            Err(AuthError::TokenRevoked)
        ));
    }

    #[rstest]
    #[case(Role::Seeker, Role::Employer)]
    #[case(Role::Employer, Role::Seeker)]
    #[tokio::test]
    async fn test_wrong_role_is_forbidden(#[case] held: Role, #[case] required: Role) {
        let guard = guard_with(Arc::new(InMemoryRevocationLedger::new()));
        let now = Utc::now();
        let issued = guard.jwt().issue_access(Uuid::new_v4(), held, now).unwrap();

        assert!(matches!(
            guard.authorize(&issued.token, TokenKind::Access, Some(required), now).await,
            Err(AuthError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_revocation_checked_before_role() {
        let ledger = Arc::new(InMemoryRevocationLedger::new());
        let guard = guard_with(ledger.clone());
        let now = Utc::now();
        let issued = guard.jwt().issue_access(Uuid::new_v4(), Role::Seeker, now).unwrap();
        ledger.revoke(&issued.claims.jti, now).await.unwrap();

        assert!(matches!(
            guard.authorize(&issued.token, TokenKind::Access, Some(Role::Employer), now).await,
            Err(AuthError::TokenRevoked)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_ledger_fails_closed() {
        let guard = guard_with(Arc::new(UnreachableLedger));
        let now = Utc::now();
        let issued = guard.jwt().issue_access(Uuid::new_v4(), Role::Seeker, now).unwrap();

        assert!(matches!(
            guard.authorize(&issued.token, TokenKind::Access, None, now).await,
            Err(AuthError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_token_is_invalid_not_revoked() {
        let ledger = Arc::new(InMemoryRevocationLedger::new());
        let guard = guard_with(ledger.clone());
        let now = Utc::now();
        let issued = guard.jwt().issue_access(Uuid::new_v4(), Role::Seeker, now).unwrap();
        ledger.revoke(&issued.claims.jti, now).await.unwrap();

        assert!(matches!(
            guard
                .authorize(&issued.token, TokenKind::Access, None, now + Duration::seconds(900))
                .await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("Bearer"))]
    #[case(Some("Bearer "))]
    #[case(Some("Bearer    "))]
    #[case(Some("Basic dXNlcjpwYXNz"))]
    #[case(Some("Bearerabc"))]
    #[case(Some("Token abc"))]
    fn test_bad_bearer_headers(#[case] header: Option<&str>) {
        assert!(matches!(bearer_token(header), Err(AuthError::InvalidToken)));
    }

    #[rstest]
    #[case("Bearer abc.def.ghi")]
    #[case("bearer abc.def.ghi")]
    #[case("BEARER abc.def.ghi")]
    #[case("Bearer   abc.def.ghi ")]
    fn test_bearer_token_extracted(#[case] header: &str) {
        assert_eq!(bearer_token(Some(header)).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_guard_bearer_matches_free_function() {
        let guard = guard_with(Arc::new(InMemoryRevocationLedger::new()));
        assert_eq!(guard.bearer(Some("bearer tok")).unwrap(), "tok");
        assert!(matches!(guard.bearer(None), Err(AuthError::InvalidToken)));
        assert!(matches!(guard.bearer(Some("Basic tok")), Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_lowercase_scheme_authorizes() {
        let guard = guard_with(Arc::new(InMemoryRevocationLedger::new()));
        let now = Utc::now();
        let issued = guard.jwt().issue_access(Uuid::new_v4(), Role::Employer, now).unwrap();
        let header = format!("bearer {}", issued.token);

        let principal = guard
            .authorize_header(Some(&header), TokenKind::Access, Some(Role::Employer), now)
            .await
            .unwrap();
        assert_eq!(principal.jti, issued.claims.jti);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_random_bearer_values_never_authorize(token in "[a-zA-Z0-9_.-]{0,80}") {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let guard = guard_with(Arc::new(InMemoryRevocationLedger::new()));
                let header = format!("Bearer {}", token);
                let result = guard
                    .authorize_header(Some(&header), TokenKind::Access, None, Utc::now())
                    .await;
                prop_assert!(matches!(result, Err(AuthError::InvalidToken)));
                Ok(())
            })?;
        }
    }
}
