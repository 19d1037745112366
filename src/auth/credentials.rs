// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store interface and login password verification.

use std::fmt;
use std::sync::Arc;

use crate::storage::StorageResult;

use super::password::PasswordHasher;

/// Username and stored password hash, as read from the credential store.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password_hash", &"[redacted]")
            .finish()
    }
}

/// Read-only lookup of credentials by username.
///
/// Lookups may block on storage I/O.
pub trait CredentialStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> StorageResult<Option<Credential>>;
}

/// Outcome of checking a username/password pair.
#[derive(Debug, PartialEq, Eq)]
pub enum Verification {
    /// Password matches the stored hash
    Verified(Credential),
    /// No account with that username
    UnknownUser,
    /// Account exists but the password does not match
    WrongPassword,
}

/// Checks a login password against a credential already read from the
/// credential store.
#[derive(Clone)]
pub struct CredentialVerifier {
    passwords: Arc<dyn PasswordHasher>,
}

impl CredentialVerifier {
    pub fn new(passwords: Arc<dyn PasswordHasher>) -> Self {
        Self { passwords }
    }

    /// Verify `password` against `credential`, the result of
    /// [`CredentialStore::find_by_username`] for the login name.
    pub fn verify(&self, credential: Option<Credential>, password: &str) -> Verification {
        let Some(credential) = credential else {
            return Verification::UnknownUser;
        };

        if self.passwords.matches(password, &credential.password_hash) {
            Verification::Verified(credential)
        } else {
            Verification::WrongPassword
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BcryptHasher;

    fn alice() -> Credential {
        Credential {
            username: "alice".to_string(),
            password_hash: BcryptHasher::new(4).hash("s3cret").unwrap(),
        }
    }

    fn verifier() -> CredentialVerifier {
        CredentialVerifier::new(Arc::new(BcryptHasher::new(4)))
    }

    #[test]
    fn correct_password_is_verified() {
        let outcome = verifier().verify(Some(alice()), "s3cret");
        match outcome {
            Verification::Verified(credential) => assert_eq!(credential.username, "alice"),
            other => panic!("expected Verified, got {other:?}"),
        }
    }

    #[test]
    fn wrong_password_is_distinguished_from_unknown_user() {
        let verifier = verifier();
        assert_eq!(
            verifier.verify(Some(alice()), "nope"),
            Verification::WrongPassword
        );
        assert_eq!(verifier.verify(None, "s3cret"), Verification::UnknownUser);
    }

    #[test]
    fn verification_reads_only_the_given_hash() {
        let mut credential = alice();
        credential.password_hash = BcryptHasher::new(4).hash("hunter2").unwrap();

        let verifier = verifier();
        assert_eq!(
            verifier.verify(Some(credential.clone()), "hunter2"),
            Verification::Verified(credential.clone())
        );
        assert_eq!(
            verifier.verify(Some(credential), "s3cret"),
            Verification::WrongPassword
        );
    }

    #[test]
    fn debug_redacts_hash() {
        let credential = Credential {
            username: "alice".to_string(),
            password_hash: "$2b$04$secret".to_string(),
        };
        let rendered = format!("{credential:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("$2b$04$secret"));
    }
}
