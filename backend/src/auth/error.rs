//! Authentication error taxonomy
//!
//! Every failure mode is a distinct kind so the boundary layer can map
//! each one to a specific HTTP response. None of these are retryable.

use crate::auth::TokenKind;
use thiserror::Error;

/// Errors produced by the token and credential operations
#[derive(Error, Debug)]
pub enum AuthError {
    /// Signature verification failed, the token is structurally
    /// malformed, or the subject claim is absent.
    #[error("Invalid token")]
    InvalidToken,

    /// Signature is valid but the token is past its expiry.
    #[error("Token has expired")]
    TokenExpired,

    /// The embedded token kind does not match what the operation expects.
    #[error("Token type {found} does not match {expected}")]
    TokenKindMismatch {
        expected: TokenKind,
        found: TokenKind,
    },

    /// Unknown email or wrong password. Deliberately conflated so login
    /// failures do not reveal which emails are registered.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Credentials are correct but the account email is unconfirmed.
    /// Safe to disclose since the password already proved identity.
    #[error("Email has not been confirmed")]
    EmailNotConfirmed,

    /// A valid access token whose subject no longer resolves to a user.
    #[error("Could not find user for this token")]
    UserNotFound,

    /// The user lookup itself failed (I/O, cancellation). Distinct from
    /// UserNotFound: an interrupted lookup is not "absent".
    #[error("User lookup failed")]
    Lookup(#[source] sqlx::Error),

    /// Token signing failed. With a symmetric secret this only happens
    /// on serialization bugs, not per-request conditions.
    #[error("Token signing failed")]
    Sign(#[source] jsonwebtoken::errors::Error),

    /// Password hashing or verification failed on malformed input.
    #[error("Password hashing failed")]
    Hash(#[source] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mismatch_message_names_both_kinds() {
        let err = AuthError::TokenKindMismatch {
            expected: TokenKind::Access,
            found: TokenKind::Confirmation,
        };
        assert_eq!(err.to_string(), "Token type confirmation does not match access");
    }

    #[test]
    fn test_credential_failures_share_one_message() {
        // Unknown email and wrong password must be indistinguishable.
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }
}
