//! Password hashing using argon2
//!
//! Hashes are salted Argon2id PHC strings. Verification goes through the
//! argon2 verifier, which compares digests in constant time.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

/// Hash checked when the account does not exist, so unknown emails cost the
/// same as wrong passwords.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| PasswordService::hash("jobboard-timing-equalizer").ok());

pub struct PasswordService;

impl PasswordService {
    /// Hash a password (blocking)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking pool
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking)
    ///
    /// A stored value that is not a PHC string never matches.
    pub fn verify(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Verify on the blocking pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }

    /// Burn one verification for an account that does not exist
    pub async fn verify_dummy(password: String) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            if let Some(hash) = DUMMY_HASH.as_deref() {
                let _ = Self::verify(&password, hash);
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash("pw-for-alice").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordService::verify("pw-for-alice", &hash));
        assert!(!PasswordService::verify("pw-for-bob", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hash1 = PasswordService::hash("same-password").unwrap();
        let hash2 = PasswordService::hash("same-password").unwrap();

        assert_ne!(hash1, hash2);
        assert!(PasswordService::verify("same-password", &hash1));
        assert!(PasswordService::verify("same-password", &hash2));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!PasswordService::verify("anything", "plaintext-password"));
        assert!(!PasswordService::verify("", ""));
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let hash = PasswordService::hash_async("async-pw".to_string()).await.unwrap();

        assert!(PasswordService::verify_async("async-pw".to_string(), hash.clone()).await.unwrap());
        assert!(!PasswordService::verify_async("wrong".to_string(), hash).await.unwrap());
        PasswordService::verify_dummy("whatever".to_string()).await.unwrap();
    }
}
