//! Current-user resolution and login authentication
//!
//! Both operations go through the [`UserStore`] seam instead of a
//! concrete pool, so the logic is testable without a database and the
//! handlers stay decoupled from the lookup mechanics.

use crate::auth::{AuthError, PasswordService, TokenKind, TokenService};
use crate::repositories::UserRecord;
use async_trait::async_trait;

/// Read-only user lookup collaborator
///
/// `find_by_email` is the existence-checked lookup (absent is a normal
/// outcome); `get_by_email` is the unchecked fetch (absent is an error).
/// The two are separate operations on purpose so callers never have to
/// guess whether `None` meant "missing" or "failed".
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, sqlx::Error>;

    async fn get_by_email(&self, email: &str) -> Result<UserRecord, sqlx::Error> {
        self.find_by_email(email)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}

/// Resolve the caller's identity from a bearer token
///
/// This is the single gate for every protected endpoint. A valid token
/// does not imply the user still exists; a deleted account surfaces as
/// [`AuthError::UserNotFound`], while a failed lookup keeps its own
/// error so it is never mistaken for "absent".
pub async fn resolve_current_user<S: UserStore + ?Sized>(
    tokens: &TokenService,
    store: &S,
    token: &str,
) -> Result<UserRecord, AuthError> {
    let subject = tokens.decode_for_kind(token, TokenKind::Access)?;

    match store.get_by_email(&subject).await {
        Ok(user) => Ok(user),
        Err(sqlx::Error::RowNotFound) => Err(AuthError::UserNotFound),
        Err(e) => Err(AuthError::Lookup(e)),
    }
}

/// Authenticate a login attempt
///
/// Unknown email and wrong password both yield
/// [`AuthError::InvalidCredentials`] so login failures cannot be used to
/// enumerate registered emails. Confirmation status is only checked once
/// the password has proven the caller's identity.
pub async fn authenticate<S: UserStore + ?Sized>(
    store: &S,
    email: &str,
    password: &str,
) -> Result<UserRecord, AuthError> {
    let user = match store.find_by_email(email).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(AuthError::InvalidCredentials),
        Err(e) => return Err(AuthError::Lookup(e)),
    };

    let valid =
        PasswordService::verify_async(password.to_string(), user.password_hash.clone()).await?;
    if !valid {
        return Err(AuthError::InvalidCredentials);
    }

    if !user.confirmed {
        return Err(AuthError::EmailNotConfirmed);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ACCESS_TOKEN_EXPIRE_MINUTES, CONFIRM_TOKEN_EXPIRE_MINUTES};
    use chrono::Utc;
    use std::collections::HashMap;
    use uuid::Uuid;

    struct MemoryStore {
        users: HashMap<String, UserRecord>,
    }

    #[async_trait]
    impl UserStore for MemoryStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
            Ok(self.users.get(email).cloned())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl UserStore for FailingStore {
        async fn find_by_email(&self, _email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }
    }

    fn user(email: &str, password: &str, confirmed: bool) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: PasswordService::hash(password).unwrap(),
            confirmed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn store_with(record: UserRecord) -> MemoryStore {
        let mut users = HashMap::new();
        users.insert(record.email.clone(), record);
        MemoryStore { users }
    }

    fn tokens() -> TokenService {
        TokenService::new(
            "test-secret",
            ACCESS_TOKEN_EXPIRE_MINUTES,
            CONFIRM_TOKEN_EXPIRE_MINUTES,
        )
    }

    #[tokio::test]
    async fn test_resolve_current_user() {
        let tokens = tokens();
        let store = store_with(user("a@example.com", "password", true));
        let token = tokens.issue_access_token("a@example.com").unwrap();

        let resolved = resolve_current_user(&tokens, &store, &token).await.unwrap();
        assert_eq!(resolved.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_resolve_deleted_user_is_not_found() {
        let tokens = tokens();
        let store = MemoryStore {
            users: HashMap::new(),
        };
        let token = tokens.issue_access_token("a@example.com").unwrap();

        let err = resolve_current_user(&tokens, &store, &token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_resolve_rejects_confirmation_token() {
        let tokens = tokens();
        let store = store_with(user("a@example.com", "password", true));
        let token = tokens.issue_confirmation_token("a@example.com").unwrap();

        let err = resolve_current_user(&tokens, &store, &token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenKindMismatch { .. }));
    }

    #[tokio::test]
    async fn test_resolve_rejects_invalid_token() {
        let tokens = tokens();
        let store = store_with(user("a@example.com", "password", true));

        let err = resolve_current_user(&tokens, &store, "invalid_token")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_user_not_found() {
        let tokens = tokens();
        let token = tokens.issue_access_token("a@example.com").unwrap();

        let err = resolve_current_user(&tokens, &FailingStore, &token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Lookup(_)));
    }

    #[tokio::test]
    async fn test_authenticate_confirmed_user() {
        let store = store_with(user("a@example.com", "password", true));
        let resolved = authenticate(&store, "a@example.com", "password")
            .await
            .unwrap();
        assert_eq!(resolved.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let store = MemoryStore {
            users: HashMap::new(),
        };
        let err = authenticate(&store, "a@example.com", "password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_same_error_as_unknown_email() {
        let store = store_with(user("a@example.com", "password", true));
        let err = authenticate(&store, "a@example.com", "wrong_password")
            .await
            .unwrap_err();
        // Identical kind to the unknown-email case, by design.
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_unconfirmed_user() {
        let store = store_with(user("a@example.com", "password", false));
        let err = authenticate(&store, "a@example.com", "password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailNotConfirmed));
    }
}
