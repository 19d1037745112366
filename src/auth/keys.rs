// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-wide signing key for HS256 session tokens.
//!
//! The key is built exactly once in `main` and shared by the
//! [`TokenIssuer`](super::TokenIssuer) and [`TokenValidator`](super::TokenValidator)
//! through an `Arc<SigningKey>`. It has no setters and no serialization, and
//! its `Debug` output never contains secret material.

use std::fmt;

use jsonwebtoken::{DecodingKey, EncodingKey};
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

/// Minimum secret length accepted for HMAC-SHA256 (256 bits).
pub const MIN_SECRET_LEN: usize = 32;

/// Length of secrets produced by [`SigningKey::generate`] (one SHA-256 block).
const GENERATED_SECRET_LEN: usize = 64;

/// Errors raised while constructing a [`SigningKey`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("signing secret must be at least {MIN_SECRET_LEN} bytes, got {0}")]
    TooShort(usize),

    #[error("system random number generator is unavailable")]
    RandomUnavailable,
}

/// Immutable symmetric secret used to sign and verify tokens.
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Build a key from configured secret bytes.
    pub fn from_secret(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(KeyError::TooShort(secret.len()));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }

    /// Build a key from fresh OS randomness.
    ///
    /// Tokens signed with a generated key stop validating when the process
    /// restarts.
    pub fn generate() -> Result<Self, KeyError> {
        let mut secret = [0u8; GENERATED_SECRET_LEN];
        SystemRandom::new()
            .fill(&mut secret)
            .map_err(|_| KeyError::RandomUnavailable)?;
        Self::from_secret(&secret)
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([redacted])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_secrets() {
        let err = SigningKey::from_secret(b"too-short").unwrap_err();
        assert_eq!(err, KeyError::TooShort(9));
    }

    #[test]
    fn accepts_minimum_length_secret() {
        assert!(SigningKey::from_secret(&[7u8; MIN_SECRET_LEN]).is_ok());
    }

    #[test]
    fn generate_produces_usable_key() {
        assert!(SigningKey::generate().is_ok());
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = SigningKey::from_secret(b"0123456789abcdef0123456789abcdef").unwrap();
        let rendered = format!("{key:?}");
        assert_eq!(rendered, "SigningKey([redacted])");
        assert!(!rendered.contains("0123456789"));
    }
}
