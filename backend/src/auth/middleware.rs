//! Authentication extractor
//!
//! Axum extractor that turns an `Authorization: Bearer <token>` header
//! into the caller's user record. Every protected handler goes through
//! this single gate.

use crate::auth::resolve_current_user;
use crate::error::ApiError;
use crate::repositories::UserRecord;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};

/// The authenticated caller, resolved from the bearer token
///
/// Resolution verifies the token as access-kind and fetches the user
/// record, so a token for a since-deleted account is rejected here.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

        let user = resolve_current_user(app_state.tokens(), app_state.db(), token).await?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_current_user_debug_output() {
        let user = CurrentUser(UserRecord {
            id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            password_hash: String::new(),
            confirmed: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        let debug_str = format!("{:?}", user);
        assert!(debug_str.contains("CurrentUser"));
    }
}
