// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Maps a validated token subject back to an account identity.

use std::sync::Arc;

use super::{AuthError, AuthenticatedIdentity, CredentialStore};

/// Resolves token subjects against the credential store.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn CredentialStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Look up `subject` and build its identity.
    ///
    /// A subject deleted after its token was issued resolves to
    /// `UnknownSubject` here, since tokens are never revoked.
    pub fn resolve(&self, subject: &str) -> Result<AuthenticatedIdentity, AuthError> {
        match self.store.find_by_username(subject) {
            Ok(Some(credential)) => Ok(AuthenticatedIdentity::user(credential.username)),
            Ok(None) => Err(AuthError::UnknownSubject),
            Err(e) => Err(AuthError::Internal(format!("credential lookup failed: {e}"))),
        }
    }
}
