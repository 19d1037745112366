// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Two layers cooperate:
//!
//! - [`authenticate`] populates the request context. It attaches an
//!   [`AuthenticatedIdentity`] when the bearer token checks out and otherwise
//!   lets the request continue anonymously. Token failures are logged here
//!   and never turned into responses.
//! - [`require_identity`] is the route gate. Exempt routes pass; every other
//!   route needs an identity or is answered with `401`.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth.clone(), require_identity))
//!     .layer(axum::middleware::from_fn_with_state(auth, authenticate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, warn};

use super::{AuthError, AuthOutcome, AuthenticatedIdentity, Authenticator};

/// Interceptor: resolve the caller's identity and attach it to the request.
///
/// The resolver may block on storage, so the pass runs on the blocking pool.
/// A panic there is recovered like any other failure: logged, request
/// continues anonymous.
pub async fn authenticate(
    State(auth): State<Arc<Authenticator>>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    if auth.is_exempt(&method, &path) {
        return next.run(request).await;
    }

    let headers = request.headers().clone();
    let outcome = {
        let path = path.clone();
        tokio::task::spawn_blocking(move || auth.authenticate(&method, &path, &headers)).await
    };

    match outcome {
        Ok(AuthOutcome::Authenticated(identity)) => {
            debug!(principal = %identity.principal, %path, "Request authenticated");
            request.extensions_mut().insert(identity);
        }
        Ok(AuthOutcome::Rejected { error, subject }) => log_rejection(&path, &error, subject.as_deref()),
        Ok(AuthOutcome::Anonymous) => debug!(%path, "No bearer token presented"),
        Ok(AuthOutcome::Exempt) => {}
        Err(e) => error!(error = %e, %path, "Authentication task failed"),
    }

    next.run(request).await
}

/// Route gate: reject anonymous requests to protected routes.
pub async fn require_identity(
    State(auth): State<Arc<Authenticator>>,
    request: Request,
    next: Next,
) -> Response {
    let exempt = auth.is_exempt(request.method(), request.uri().path());

    if exempt || request.extensions().get::<AuthenticatedIdentity>().is_some() {
        return next.run(request).await;
    }

    debug!(path = %request.uri().path(), "Rejecting anonymous request to protected route");
    AuthError::MissingIdentity.into_response()
}

fn log_rejection(path: &str, error: &AuthError, subject: Option<&str>) {
    match error {
        AuthError::Internal(_) => error!(
            error = %error,
            error_code = error.error_code(),
            subject = subject.unwrap_or("-"),
            %path,
            "Could not resolve identity; continuing unauthenticated"
        ),
        AuthError::Malformed
        | AuthError::InvalidSignature
        | AuthError::Expired
        | AuthError::UnknownSubject
        | AuthError::MissingIdentity => warn!(
            error_code = error.error_code(),
            subject = subject.unwrap_or("-"),
            %path,
            "Bearer token rejected; continuing unauthenticated"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::testing::{store_with, FailingStore};
    use crate::auth::{CredentialStore, ExemptRoutes, OptionalAuth, SigningKey};
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, Method, Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use chrono::{TimeDelta, Utc};
    use tower::ServiceExt;

    const SECRET: &[u8] = b"middleware-secret-0123456789abcdef";

    async fn whoami(OptionalAuth(identity): OptionalAuth) -> String {
        identity.map(|i| i.principal).unwrap_or_else(|| "anonymous".to_string())
    }

    fn setup(store: Arc<dyn CredentialStore>) -> (Router, Arc<Authenticator>) {
        let key = Arc::new(SigningKey::from_secret(SECRET).unwrap());
        let auth = Arc::new(Authenticator::new(
            key,
            store,
            ExemptRoutes::with_public(["/public/**"]),
        ));
        let app = Router::new()
            .route("/public/whoami", get(whoami))
            .route("/private/whoami", get(whoami))
            .route("/api/users/login", get(whoami))
            .layer(from_fn_with_state(auth.clone(), require_identity))
            .layer(from_fn_with_state(auth.clone(), authenticate));
        (app, auth)
    }

    async fn call(app: Router, method: Method, path: &str, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = HttpRequest::builder().method(method).uri(path);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_token_reaches_protected_handler_with_identity() {
        let (app, auth) = setup(Arc::new(store_with(&["alice"])));
        let token = auth.issuer().issue("alice").unwrap();

        let (status, body) = call(app, Method::GET, "/private/whoami", Some(&format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice");
    }

    #[tokio::test]
    async fn protected_route_without_identity_is_401() {
        let (app, _) = setup(Arc::new(store_with(&["alice"])));

        let (status, body) = call(app, Method::GET, "/private/whoami", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error_code"], "missing_identity");
    }

    #[tokio::test]
    async fn invalid_tokens_on_protected_route_are_401_not_500() {
        let (app, auth) = setup(Arc::new(store_with(&["alice"])));
        let expired = auth
            .issuer()
            .issue_at("alice", Utc::now() - TimeDelta::hours(25))
            .unwrap();
        let orphan = auth.issuer().issue("ghost").unwrap();

        for value in [
            format!("Bearer {expired}"),
            format!("Bearer {orphan}"),
            "Bearer not.a.token".to_string(),
            "Basic YWxpY2U6cHc=".to_string(),
        ] {
            let (status, _) = call(app.clone(), Method::GET, "/private/whoami", Some(&value)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{value}");
        }
    }

    #[tokio::test]
    async fn exempt_route_reaches_handler_anonymously() {
        let (app, auth) = setup(Arc::new(store_with(&["alice"])));
        let expired = auth
            .issuer()
            .issue_at("alice", Utc::now() - TimeDelta::hours(25))
            .unwrap();

        for value in [None, Some("Bearer".to_string()), Some(format!("Bearer {expired}"))] {
            let (status, body) = call(app.clone(), Method::GET, "/public/whoami", value.as_deref()).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "anonymous");
        }

        let (status, body) = call(app, Method::GET, "/api/users/login", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn exempt_route_ignores_even_valid_tokens() {
        let (app, auth) = setup(Arc::new(store_with(&["alice"])));
        let token = auth.issuer().issue("alice").unwrap();

        let (_, body) = call(app, Method::GET, "/public/whoami", Some(&format!("Bearer {token}"))).await;
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn store_failure_does_not_break_pipeline() {
        let (app, auth) = setup(Arc::new(FailingStore));
        let token = auth.issuer().issue("alice").unwrap();
        let bearer = format!("Bearer {token}");

        let (status, _) = call(app.clone(), Method::GET, "/private/whoami", Some(&bearer)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = call(app, Method::GET, "/public/whoami", Some(&bearer)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }
}
