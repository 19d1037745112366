// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Header};

use super::{keys::SigningKey, validator::TOKEN_ALGORITHM, AuthError, Claims};

/// Issues signed, self-contained session tokens.
///
/// The issuer trusts its caller: credentials are checked by the
/// [`CredentialVerifier`](super::CredentialVerifier) before `issue` is called.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: Arc<SigningKey>,
    header: Header,
}

impl TokenIssuer {
    pub fn new(key: Arc<SigningKey>) -> Self {
        Self {
            key,
            header: Header::new(TOKEN_ALGORITHM),
        }
    }

    /// Issue a token for `subject`, valid for 24 hours from now.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token for `subject` as of `issued_at`.
    ///
    /// Output is a pure function of the subject, the instant (in whole
    /// seconds) and the signing key.
    pub fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        if subject.is_empty() {
            return Err(AuthError::Internal(
                "cannot issue a token for an empty subject".to_string(),
            ));
        }

        let claims = Claims::new(subject, issued_at);
        encode(&self.header, &claims, self.key.encoding_key())
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }
}
