// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the Couple Space API.
//!
//! ## Auth Flow
//!
//! 1. `POST /api/users/login` checks the password with [`CredentialVerifier`]
//!    and returns a token from [`TokenIssuer`] (HS256, valid 24 hours).
//! 2. Clients send `Authorization: Bearer <token>` on later requests.
//! 3. The [`middleware::authenticate`] interceptor:
//!    - skips exempt routes ([`ExemptRoutes`])
//!    - validates the token ([`TokenValidator`])
//!    - resolves `sub` to an account ([`IdentityResolver`])
//!    - attaches the [`AuthenticatedIdentity`] to the request, or lets the
//!      request continue anonymously
//! 4. The [`middleware::require_identity`] gate answers `401` for anonymous
//!    requests to protected routes.
//!
//! ## Security
//!
//! - One [`SigningKey`] per process, shared read-only by issuer and validator
//! - Signature is verified before any claim is trusted
//! - No server-side session, revocation or refresh state

pub mod authenticator;
pub mod claims;
pub mod credentials;
pub mod error;
pub mod exempt;
pub mod extractor;
pub mod issuer;
pub mod keys;
pub mod middleware;
pub mod password;
pub mod resolver;
pub mod roles;
pub mod validator;

pub use authenticator::{bearer_token, AuthOutcome, Authenticator};
pub use claims::{AuthenticatedIdentity, Claims, TOKEN_LIFETIME_SECS};
pub use credentials::{Credential, CredentialStore, CredentialVerifier, Verification};
pub use error::AuthError;
pub use exempt::{ExemptRoutes, DEFAULT_EXEMPT_ROUTES};
pub use extractor::{Auth, OptionalAuth};
pub use issuer::TokenIssuer;
pub use keys::{KeyError, SigningKey};
pub use password::{BcryptHasher, PasswordHasher};
pub use resolver::IdentityResolver;
pub use roles::Role;
pub use validator::{Rejection, TokenValidator};
