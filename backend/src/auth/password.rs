//! Password hashing using bcrypt
//!
//! bcrypt is intentionally CPU-intensive; async wrappers offload the
//! work to the blocking thread pool so it never stalls the runtime.
//!
//! Known boundary: bcrypt only considers the first 72 bytes of input.
//! Longer passwords are silently truncated by the algorithm itself.
//! This is inherited behavior, covered by an explicit test rather than
//! papered over with a pre-hash.

use crate::auth::AuthError;
use bcrypt::DEFAULT_COST;

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password with a random salt (blocking operation)
    pub fn hash(password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, DEFAULT_COST)
            .map_err(|e| AuthError::Hash(anyhow::anyhow!("Failed to hash password: {}", e)))
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| AuthError::Hash(anyhow::anyhow!("Task join error: {}", e)))?
    }

    /// Verify a password against a hash (blocking operation)
    ///
    /// Returns false on mismatch; errors only on a malformed hash.
    pub fn verify(password: &str, hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, hash)
            .map_err(|e| AuthError::Hash(anyhow::anyhow!("Invalid hash format: {}", e)))
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Hash(anyhow::anyhow!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hash = PasswordService::hash(password).unwrap();

        assert!(PasswordService::verify(password, &hash).unwrap());
        assert!(!PasswordService::verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = "test_password";
        let hash1 = PasswordService::hash(password).unwrap();
        let hash2 = PasswordService::hash(password).unwrap();

        // Hashes differ due to random salt
        assert_ne!(hash1, hash2);

        assert!(PasswordService::verify(password, &hash1).unwrap());
        assert!(PasswordService::verify(password, &hash2).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error_not_a_mismatch() {
        let result = PasswordService::verify("password", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(AuthError::Hash(_))));
    }

    #[test]
    fn test_72_byte_truncation_boundary() {
        // Passwords that agree on the first 72 bytes are interchangeable
        // to bcrypt. Documented boundary, not a bug to fix here.
        let prefix = "x".repeat(72);
        let a = format!("{}AAAA", prefix);
        let b = format!("{}BBBB", prefix);

        let hash = PasswordService::hash(&a).unwrap();
        assert!(PasswordService::verify(&b, &hash).unwrap());

        // Divergence inside the first 72 bytes still matters.
        let c = format!("y{}", &prefix[1..]);
        assert!(!PasswordService::verify(&c, &hash).unwrap());
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let password = "async_test_password".to_string();
        let hash = PasswordService::hash_async(password.clone()).await.unwrap();

        assert!(PasswordService::verify_async(password, hash.clone())
            .await
            .unwrap());
        assert!(!PasswordService::verify_async("wrong".to_string(), hash)
            .await
            .unwrap());
    }
}
