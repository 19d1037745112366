// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token validation.
//!
//! ## Check Order
//!
//! 1. Structure: three dot-separated segments and a decodable header that
//!    declares HS256. Anything else is [`AuthError::Malformed`].
//! 2. Signature: the signature segment must decode, and the HMAC over the
//!    raw `header.payload` bytes must match. Nothing in the payload is read
//!    before this passes, so a forged `exp` can never skip straight to the
//!    expiry check.
//! 3. Claims: payload decodes with a non-empty `sub` and numeric `exp`.
//!    A payload that fails here is [`AuthError::Malformed`] even though it
//!    was correctly signed.
//! 4. Expiry: `now < exp`, evaluated against the caller's clock.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, Validation};

use super::{keys::SigningKey, AuthError, Claims};

/// The only algorithm tokens are issued with or accepted under.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// A failed validation.
///
/// `subject` is only set once the signature has verified, so it never
/// carries a name taken from a forged payload.
#[derive(Debug)]
pub struct Rejection {
    pub error: AuthError,
    pub subject: Option<String>,
}

impl From<AuthError> for Rejection {
    fn from(error: AuthError) -> Self {
        Self {
            error,
            subject: None,
        }
    }
}

/// Verifies tokens produced by the [`TokenIssuer`](super::TokenIssuer).
///
/// Stateless: two calls with the same token at the same instant always
/// agree.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    key: Arc<SigningKey>,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(key: Arc<SigningKey>) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is checked in `check_at` so the instant is injectable.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self { key, validation }
    }

    /// Validate `token` against the current wall clock.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate `token` as of `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        self.check_at(token, now).map_err(|rejection| rejection.error)
    }

    /// Like [`validate`](Self::validate), keeping the verified subject of an
    /// expired token for logging.
    pub fn check(&self, token: &str) -> Result<Claims, Rejection> {
        self.check_at(token, Utc::now())
    }

    /// Like [`validate_at`](Self::validate_at), keeping the verified subject
    /// of an expired token for logging.
    pub fn check_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, Rejection> {
        check_structure(token)?;

        let claims = decode::<Claims>(token, self.key.decoding_key(), &self.validation)
            .map_err(|e| classify(e.kind()))?
            .claims;

        if claims.sub.is_empty() {
            return Err(AuthError::Malformed.into());
        }

        if claims.is_expired_at(now) {
            return Err(Rejection {
                error: AuthError::Expired,
                subject: Some(claims.sub),
            });
        }

        Ok(claims)
    }
}

/// Reject anything that is not `header.payload.signature` with an HS256
/// header and a decodable signature. The payload is left untouched here.
fn check_structure(token: &str) -> Result<(), AuthError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(_payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::Malformed);
    };

    let header = decode_header(token).map_err(|_| AuthError::Malformed)?;
    if header.alg != TOKEN_ALGORITHM {
        return Err(AuthError::Malformed);
    }

    if URL_SAFE_NO_PAD.decode(signature).is_err() {
        return Err(AuthError::InvalidSignature);
    }

    Ok(())
}

/// Map a decoding failure onto the token failure taxonomy.
///
/// Header and signature segments were already checked, so a base64 failure
/// here comes from a payload whose signature verified.
fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Malformed,
    }
}
