// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the identity attached by the interceptor.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity is AuthenticatedIdentity
//! }
//! ```
//!
//! Neither extractor looks at the `Authorization` header. They only read
//! what [`authenticate`](super::middleware::authenticate) stored in the
//! request extensions.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, AuthenticatedIdentity};

/// Extractor that requires an authenticated identity.
///
/// Rejects with `401 missing_identity` when the request is anonymous.
pub struct Auth(pub AuthenticatedIdentity);

impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingIdentity)
    }
}

/// Optional authentication extractor.
///
/// Returns `None` for anonymous requests instead of rejecting.
pub struct OptionalAuth(pub Option<AuthenticatedIdentity>);

impl<S: Send + Sync> FromRequestParts<S> for OptionalAuth {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(
            parts.extensions.get::<AuthenticatedIdentity>().cloned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn auth_requires_identity() {
        let mut parts = parts();
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingIdentity)));
    }

    #[tokio::test]
    async fn auth_reads_identity_from_extensions() {
        let mut parts = parts();
        parts.extensions.insert(AuthenticatedIdentity::user("alice"));

        let Auth(identity) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(identity.principal, "alice");
    }

    #[tokio::test]
    async fn auth_ignores_raw_header() {
        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer abc.def.ghi")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingIdentity)));
    }

    #[tokio::test]
    async fn optional_auth_returns_none_without_identity() {
        let mut parts = parts();
        let OptionalAuth(identity) = OptionalAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn optional_auth_returns_identity_when_present() {
        let mut parts = parts();
        parts.extensions.insert(AuthenticatedIdentity::user("bob"));

        let OptionalAuth(identity) = OptionalAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(identity.unwrap().principal, "bob");
    }
}
