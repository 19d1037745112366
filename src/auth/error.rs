// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Authentication error type.
///
/// The first four variants are the token failure taxonomy. The interceptor
/// handles them locally and lets the request continue anonymously; only
/// `MissingIdentity` (raised by the route gate and the `Auth` extractor) and
/// `Internal` are ever rendered as responses.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token structure could not be decoded, or uses an unsupported algorithm
    #[error("Token is malformed")]
    Malformed,
    /// Token signature does not verify against the signing key
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// Token signature is valid but the token has expired
    #[error("Token has expired")]
    Expired,
    /// Token subject does not exist in the credential store
    #[error("Token subject is not a known user")]
    UnknownSubject,
    /// A protected route was reached without an authenticated identity
    #[error("Authentication is required")]
    MissingIdentity,
    /// Internal error
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    state: &'static str,
    msg: String,
    data: Option<()>,
    error_code: &'static str,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Malformed => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "token_expired",
            AuthError::UnknownSubject => "unknown_subject",
            AuthError::MissingIdentity => "missing_identity",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Malformed
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::UnknownSubject
            | AuthError::MissingIdentity => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            state: "fail",
            msg: self.to_string(),
            data: None,
            error_code: self.error_code(),
        });
        (status, body).into_response()
    }
}
