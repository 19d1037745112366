// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{
    Authenticator, CredentialStore, CredentialVerifier, ExemptRoutes, PasswordHasher, SigningKey,
};
use crate::storage::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth: Arc<Authenticator>,
    pub verifier: Arc<CredentialVerifier>,
    pub passwords: Arc<dyn PasswordHasher>,
}

impl AppState {
    /// Wire the database, signing key and password hasher together.
    ///
    /// The database doubles as the credential store for login and token
    /// subject resolution.
    pub fn new(
        db: Arc<Database>,
        key: Arc<SigningKey>,
        passwords: Arc<dyn PasswordHasher>,
        exempt: ExemptRoutes,
    ) -> Self {
        let store: Arc<dyn CredentialStore> = db.clone();
        Self {
            auth: Arc::new(Authenticator::new(key, store, exempt)),
            verifier: Arc::new(CredentialVerifier::new(passwords.clone())),
            db,
            passwords,
        }
    }
}
