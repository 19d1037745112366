// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request authentication decision.
//!
//! [`Authenticator::authenticate`] is the state machine behind the
//! interceptor middleware: a request ends up `Exempt`, `Anonymous`,
//! `Authenticated` or `Rejected`. None of these outcomes stops the request;
//! the route gate decides what an absent identity means.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap, Method};

use super::{
    keys::SigningKey, AuthError, AuthenticatedIdentity, CredentialStore, ExemptRoutes,
    IdentityResolver, TokenIssuer, TokenValidator,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Result of one authentication pass.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Route is exempt; no token was examined
    Exempt,
    /// No usable bearer token was presented
    Anonymous,
    /// Token validated and subject resolved
    Authenticated(AuthenticatedIdentity),
    /// A token was presented but failed validation or resolution
    Rejected {
        error: AuthError,
        /// Subject, once the signature verified
        subject: Option<String>,
    },
}

impl AuthOutcome {
    /// The identity to attach to the request, if any.
    pub fn into_identity(self) -> Option<AuthenticatedIdentity> {
        match self {
            AuthOutcome::Authenticated(identity) => Some(identity),
            AuthOutcome::Exempt | AuthOutcome::Anonymous | AuthOutcome::Rejected { .. } => None,
        }
    }
}

/// Issuer, validator and resolver sharing one signing key, plus the exempt
/// route set.
#[derive(Clone)]
pub struct Authenticator {
    issuer: TokenIssuer,
    validator: TokenValidator,
    resolver: IdentityResolver,
    exempt: ExemptRoutes,
}

impl Authenticator {
    pub fn new(
        key: Arc<SigningKey>,
        store: Arc<dyn CredentialStore>,
        exempt: ExemptRoutes,
    ) -> Self {
        Self {
            issuer: TokenIssuer::new(key.clone()),
            validator: TokenValidator::new(key),
            resolver: IdentityResolver::new(store),
            exempt,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn is_exempt(&self, method: &Method, path: &str) -> bool {
        self.exempt.is_exempt(method, path)
    }

    /// Decide the authentication outcome of a request.
    pub fn authenticate(&self, method: &Method, path: &str, headers: &HeaderMap) -> AuthOutcome {
        if self.is_exempt(method, path) {
            return AuthOutcome::Exempt;
        }

        let Some(token) = bearer_token(headers) else {
            return AuthOutcome::Anonymous;
        };

        let claims = match self.validator.check(token) {
            Ok(claims) => claims,
            Err(rejection) => {
                return AuthOutcome::Rejected {
                    error: rejection.error,
                    subject: rejection.subject,
                }
            }
        };

        match self.resolver.resolve(&claims.sub) {
            Ok(identity) => AuthOutcome::Authenticated(identity),
            Err(error) => AuthOutcome::Rejected {
                error,
                subject: Some(claims.sub),
            },
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is case-sensitive and must be followed by exactly one space.
/// Any other shape counts as no token at all.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?;

    if token.is_empty() || token.starts_with(char::is_whitespace) {
        return None;
    }

    Some(token)
}
