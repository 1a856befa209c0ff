//! JWT token issuance and verification
//!
//! Two token kinds are issued: short-lived access tokens and long-lived
//! confirmation tokens. The kind is part of the signed claims, so a
//! confirmation token can never be replayed as an access token.
//!
//! Keys are pre-computed once at startup and shared via AppState.

use crate::auth::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Access token time-to-live
pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;
/// Confirmation token time-to-live (24 hours)
pub const CONFIRM_TOKEN_EXPIRE_MINUTES: i64 = 1440;

/// Token kind embedded in the signed claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Confirmation,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Confirmation => write!(f, "confirmation"),
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email). Optional on decode so a missing claim is
    /// reported as an invalid token rather than a parse failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token kind
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

/// Pre-computed JWT keys for efficient token operations
///
/// These are expensive to create, so they are built once and cached.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from the configured secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Token service owning issuance and typed verification
///
/// Clone is cheap: the keys are Arc-wrapped. Construct once at startup
/// and store in AppState, never per-request.
#[derive(Clone)]
pub struct TokenService {
    keys: JwtKeys,
    access_expire_minutes: i64,
    confirm_expire_minutes: i64,
}

impl TokenService {
    /// Create a new token service with pre-computed keys
    pub fn new(secret: &str, access_expire_minutes: i64, confirm_expire_minutes: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            access_expire_minutes,
            confirm_expire_minutes,
        }
    }

    /// Issue an access token for a subject (user email)
    #[inline]
    pub fn issue_access_token(&self, subject: &str) -> Result<String, AuthError> {
        self.issue(subject, TokenKind::Access, self.access_expire_minutes)
    }

    /// Issue an email-confirmation token for a subject
    #[inline]
    pub fn issue_confirmation_token(&self, subject: &str) -> Result<String, AuthError> {
        self.issue(subject, TokenKind::Confirmation, self.confirm_expire_minutes)
    }

    fn issue(
        &self,
        subject: &str,
        kind: TokenKind,
        expire_minutes: i64,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: (now + Duration::minutes(expire_minutes)).timestamp(),
            iat: now.timestamp(),
            kind,
        };

        encode(&Header::default(), &claims, &self.keys.encoding).map_err(AuthError::Sign)
    }

    /// Verify a token and return its subject, requiring a specific kind
    ///
    /// Checks run in order: signature/shape, expiry, subject presence,
    /// kind. Each failure is a distinct error kind.
    pub fn decode_for_kind(&self, token: &str, expected: TokenKind) -> Result<String, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token past its exp is expired, full stop. This
        // also lets tests exercise expiry with a negative TTL.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        // jsonwebtoken keeps a token alive through the second named by
        // exp; here a token is invalid from the expiry instant onward.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        let subject = data.claims.sub.ok_or(AuthError::InvalidToken)?;

        if data.claims.kind != expected {
            return Err(AuthError::TokenKindMismatch {
                expected,
                found: data.claims.kind,
            });
        }

        Ok(subject)
    }

    /// Access token expiry window in minutes
    #[inline]
    pub fn access_token_expire_minutes(&self) -> i64 {
        self.access_expire_minutes
    }

    /// Confirmation token expiry window in minutes
    #[inline]
    pub fn confirm_token_expire_minutes(&self) -> i64 {
        self.confirm_expire_minutes
    }
}
