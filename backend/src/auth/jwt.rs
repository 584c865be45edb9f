//! JWT token issuance and verification
//!
//! Tokens are HS256-signed and carry everything needed to check them, so
//! verification never touches storage. Revocation is layered on top by the
//! [`AuthGuard`](super::AuthGuard).

use super::AuthError;
use chrono::{DateTime, Duration, Utc};
use jobboard_shared::Role;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Access tokens authorize individual operations; refresh tokens only mint
/// new access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// JWT ID, the revocation key
    pub jti: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Present on access tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// A freshly signed token together with the claims inside it
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Pre-computed JWT keys
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
        }
    }
}

/// Token lifetimes
#[derive(Debug, Clone, Copy)]
pub struct JwtConfig {
    pub access_token_expiry_secs: i64,
    pub refresh_token_expiry_secs: i64,
}

impl JwtConfig {
    pub fn lifetime(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => Duration::seconds(self.access_token_expiry_secs),
            TokenKind::Refresh => Duration::seconds(self.refresh_token_expiry_secs),
        }
    }
}

/// Token codec
///
/// Built once at startup from the process-wide secret and shared by cheap
/// clone; the keys never change while the process runs.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    config: JwtConfig,
    validation: Arc<Validation>,
}

impl JwtService {
    pub fn new(secret: &str, access_token_expiry_secs: i64, refresh_token_expiry_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the caller's clock in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            keys: JwtKeys::new(secret.as_bytes()),
            config: JwtConfig {
                access_token_expiry_secs,
                refresh_token_expiry_secs,
            },
            validation: Arc::new(validation),
        }
    }

    /// Issue an access token; the role is embedded and trusted until expiry
    pub fn issue_access(&self, subject: Uuid, role: Role, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        self.issue(subject, TokenKind::Access, Some(role), now)
    }

    /// Issue a refresh token; it never carries a role
    pub fn issue_refresh(&self, subject: Uuid, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        self.issue(subject, TokenKind::Refresh, None, now)
    }

    fn issue(
        &self,
        subject: Uuid,
        kind: TokenKind,
        role: Option<Role>,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let exp = now + self.config.lifetime(kind);

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind,
            role,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign {} token: {}", kind, e))?;

        Ok(IssuedToken { token, claims })
    }

    /// Check signature, structure and expiry
    ///
    /// A token is valid strictly before its `exp`. Revocation is not
    /// consulted here.
    pub fn verify(&self, raw: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(raw, &self.keys.decoding, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.config.access_token_expiry_secs
    }

    /// Longest lifetime of any token this service signs
    pub fn max_lifetime(&self) -> Duration {
        self.config
            .lifetime(TokenKind::Access)
            .max(self.config.lifetime(TokenKind::Refresh))
    }
}
