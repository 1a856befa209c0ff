//! User service: registration, email confirmation, and login
//!
//! Password hashing and verification run on the blocking thread pool;
//! outbound email is dispatched as a background task so registration
//! never waits on Mailgun.

use crate::auth::{authenticate, PasswordService, TokenKind, TokenService};
use crate::clients::EmailClient;
use crate::error::ApiError;
use crate::repositories::UserRepository;
use social_media_shared::types::{AccessToken, UserProfile};
use social_media_shared::validation;
use sqlx::PgPool;
use tracing::{error, info};

/// User service for account operations
pub struct UserService;

impl UserService {
    /// Register a new, unconfirmed user and send the confirmation email
    pub async fn register(
        pool: &PgPool,
        tokens: &TokenService,
        mailer: &EmailClient,
        public_url: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        validation::validate_email(email).map_err(ApiError::Validation)?;
        validation::validate_password(password).map_err(ApiError::Validation)?;

        if UserRepository::email_exists(pool, email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(password.to_string()).await?;

        let user = UserRepository::create(pool, email, &password_hash)
            .await
            .map_err(map_create_error)?;

        info!("Registered user {}", user.id);

        let confirmation_token = tokens.issue_confirmation_token(email)?;
        let confirmation_url = format!("{}/confirm/{}", public_url, confirmation_token);

        // Fire and forget: a Mailgun hiccup must not fail registration.
        let mailer = mailer.clone();
        let recipient = email.to_string();
        tokio::spawn(async move {
            if let Err(e) = mailer
                .send_registration_email(&recipient, &confirmation_url)
                .await
            {
                error!("Failed to send registration email: {}", e);
            }
        });

        Ok(())
    }

    /// Complete the email-confirmation flow for a confirmation token
    pub async fn confirm_email(
        pool: &PgPool,
        tokens: &TokenService,
        token: &str,
    ) -> Result<(), ApiError> {
        let email = tokens.decode_for_kind(token, TokenKind::Confirmation)?;

        let updated = UserRepository::mark_confirmed(pool, &email)
            .await
            .map_err(ApiError::Internal)?;
        if !updated {
            // Token is valid but the account is gone.
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        info!("Confirmed email for {}", email.get(..3).unwrap_or(&email));
        Ok(())
    }

    /// Login with email and password, issuing an access token
    pub async fn login(
        pool: &PgPool,
        tokens: &TokenService,
        email: &str,
        password: &str,
    ) -> Result<AccessToken, ApiError> {
        let user = authenticate(pool, email, password).await?;

        let access_token = tokens.issue_access_token(&user.email)?;

        Ok(AccessToken {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    /// Shape a user record into its public profile
    pub fn profile(user: crate::repositories::UserRecord) -> UserProfile {
        UserProfile {
            id: user.id,
            email: user.email,
            confirmed: user.confirmed,
            created_at: user.created_at,
        }
    }
}

/// Map a failed user insert to the boundary error for registration.
///
/// The existence check and the insert are not atomic, so a concurrent
/// registration can land between them and trip the unique constraint
/// on email. That is the same conflict the sequential path reports.
fn map_create_error(e: anyhow::Error) -> ApiError {
    match e.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            ApiError::Conflict("Email already registered".to_string())
        }
        _ => ApiError::Internal(e),
    }
}
