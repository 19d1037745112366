// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User account repository.
//!
//! Accounts are keyed by username, which is unique. The password hash never
//! leaves this module except through [`CredentialStore`].

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use super::database::{next_id, Database, USERS};
use super::{StorageError, StorageResult};
use crate::auth::{Credential, CredentialStore};

const USER_SEQUENCE: &str = "users";

/// Account record as persisted.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub id: u64,
    pub username: String,
    /// bcrypt hash, never the plain password
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[redacted]")
            .finish()
    }
}

/// Repository for user accounts.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Check if an account with this username exists.
    pub fn exists(&self, username: &str) -> StorageResult<bool> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(USERS)?;
        Ok(table.get(username)?.is_some())
    }

    /// Look up an account by username.
    pub fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(username)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Create an account. The duplicate check and insert share one write
    /// transaction, so two concurrent registrations cannot both succeed.
    pub fn create(&self, username: &str, password_hash: &str) -> StorageResult<StoredUser> {
        let write_txn = self.db.inner().begin_write()?;
        let user = {
            let mut table = write_txn.open_table(USERS)?;
            if table.get(username)?.is_some() {
                return Err(StorageError::AlreadyExists(format!("User {username}")));
            }

            let now = Utc::now();
            let user = StoredUser {
                id: next_id(&write_txn, USER_SEQUENCE)?,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_at: now,
                updated_at: now,
            };
            let bytes = serde_json::to_vec(&user)?;
            table.insert(username, bytes.as_slice())?;
            user
        };
        write_txn.commit()?;

        tracing::debug!(user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }
}

impl From<&StoredUser> for Credential {
    fn from(user: &StoredUser) -> Self {
        Credential {
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
        }
    }
}

impl CredentialStore for Database {
    fn find_by_username(&self, username: &str) -> StorageResult<Option<Credential>> {
        Ok(self
            .users()
            .find_by_username(username)?
            .as_ref()
            .map(Credential::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let db = Database::open_in(dir.path()).unwrap();
        (db, dir)
    }

    #[test]
    fn create_and_find() {
        let (db, _dir) = temp_db();
        let repo = db.users();

        assert!(!repo.exists("alice").unwrap());
        let created = repo.create("alice", "$2b$04$hash").unwrap();
        assert_eq!(created.id, 1);
        assert!(repo.exists("alice").unwrap());

        let found = repo.find_by_username("alice").unwrap().unwrap();
        assert_eq!(found, created);
        assert!(repo.find_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let (db, _dir) = temp_db();
        let repo = db.users();

        repo.create("alice", "h1").unwrap();
        let err = repo.create("alice", "h2").unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));

        // Original hash untouched
        let found = repo.find_by_username("alice").unwrap().unwrap();
        assert_eq!(found.password_hash, "h1");
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let (db, _dir) = temp_db();
        let repo = db.users();

        repo.create("alice", "h").unwrap();
        let other = repo.create("Alice", "h").unwrap();
        assert_eq!(other.id, 2);
    }

    #[test]
    fn database_serves_as_credential_store() {
        let (db, _dir) = temp_db();
        db.users().create("alice", "stored-hash").unwrap();

        let credential = CredentialStore::find_by_username(&db, "alice").unwrap().unwrap();
        assert_eq!(credential.username, "alice");
        assert_eq!(credential.password_hash, "stored-hash");
        assert!(CredentialStore::find_by_username(&db, "ghost").unwrap().is_none());
    }

    #[test]
    fn debug_redacts_hash() {
        let (db, _dir) = temp_db();
        let user = db.users().create("alice", "secret-hash").unwrap();
        assert!(!format!("{user:?}").contains("secret-hash"));
    }
}
