//! Authentication routes
//!
//! Registration, email confirmation, login, and the current-user
//! profile endpoint.

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use social_media_shared::types::{
    AccessToken, Detail, LoginRequest, RegisterRequest, UserProfile,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/confirm/:token", get(confirm_email))
        .route("/token", post(login))
        .route("/me", get(get_profile))
}

/// Register a new user
///
/// POST /register
///
/// The account starts unconfirmed; a confirmation link is emailed as a
/// background task.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Detail>)> {
    UserService::register(
        &state.db,
        state.tokens(),
        state.mailer(),
        &state.config().server.public_url,
        &req.email,
        &req.password,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(Detail {
            detail: "User registered successfully. Please confirm your email.".to_string(),
        }),
    ))
}

/// Complete email confirmation
///
/// GET /confirm/{token}
///
/// Accepts confirmation-kind tokens only; an access token presented
/// here is rejected with a kind mismatch.
async fn confirm_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<Detail>> {
    UserService::confirm_email(&state.db, state.tokens(), &token).await?;

    Ok(Json(Detail {
        detail: "User confirmed".to_string(),
    }))
}

/// Login with email and password
///
/// POST /token
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AccessToken>> {
    let token = UserService::login(&state.db, state.tokens(), &req.email, &req.password).await?;
    Ok(Json(token))
}

/// Get the current user's profile (requires authentication)
///
/// GET /me
async fn get_profile(CurrentUser(user): CurrentUser) -> ApiResult<Json<UserProfile>> {
    Ok(Json(UserService::profile(user)))
}
