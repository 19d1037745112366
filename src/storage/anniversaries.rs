// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Anniversary repository.
//!
//! Records are keyed by a sequence-allocated id, so iteration order is
//! creation order.

use chrono::{NaiveDate, NaiveDateTime};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use super::database::{next_id, Database, ANNIVERSARIES};
use super::{StorageError, StorageResult};

const ANNIVERSARY_SEQUENCE: &str = "anniversaries";

/// Anniversary record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredAnniversary {
    pub id: u64,
    /// Owning user's id
    pub user_id: u64,
    pub name: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub remind: bool,
    pub remind_time: Option<NaiveDateTime>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
}

/// Fields supplied by the caller when creating an anniversary.
#[derive(Debug, Clone)]
pub struct NewAnniversary {
    pub user_id: u64,
    pub name: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub remind: bool,
    pub remind_time: Option<NaiveDateTime>,
}

/// Repository for anniversaries.
pub struct AnniversaryRepository<'a> {
    db: &'a Database,
}

impl<'a> AnniversaryRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new anniversary stamped with `today`.
    pub fn create(&self, new: NewAnniversary, today: NaiveDate) -> StorageResult<StoredAnniversary> {
        let write_txn = self.db.inner().begin_write()?;
        let anniversary = {
            let anniversary = StoredAnniversary {
                id: next_id(&write_txn, ANNIVERSARY_SEQUENCE)?,
                user_id: new.user_id,
                name: new.name,
                date: new.date,
                description: new.description,
                remind: new.remind,
                remind_time: new.remind_time,
                created_at: today,
                updated_at: today,
            };
            let mut table = write_txn.open_table(ANNIVERSARIES)?;
            let bytes = serde_json::to_vec(&anniversary)?;
            table.insert(anniversary.id, bytes.as_slice())?;
            anniversary
        };
        write_txn.commit()?;

        tracing::debug!(id = anniversary.id, user_id = anniversary.user_id, "Anniversary created");
        Ok(anniversary)
    }

    /// Get an anniversary by id.
    pub fn get(&self, id: u64) -> StorageResult<StoredAnniversary> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(ANNIVERSARIES)?;
        match table.get(id)? {
            Some(guard) => Ok(serde_json::from_slice(guard.value())?),
            None => Err(StorageError::NotFound(format!("Anniversary {id}"))),
        }
    }

    /// Delete an anniversary by id.
    pub fn delete(&self, id: u64) -> StorageResult<()> {
        let write_txn = self.db.inner().begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(ANNIVERSARIES)?;
            let removed = table.remove(id)?.is_some();
            removed
        };
        if !removed {
            return Err(StorageError::NotFound(format!("Anniversary {id}")));
        }
        write_txn.commit()?;
        Ok(())
    }

    /// All anniversaries in id order.
    pub fn list_all(&self) -> StorageResult<Vec<StoredAnniversary>> {
        self.scan(|_| true)
    }

    /// Anniversaries owned by `user_id`, in id order.
    pub fn list_by_user(&self, user_id: u64) -> StorageResult<Vec<StoredAnniversary>> {
        self.scan(|anniversary| anniversary.user_id == user_id)
    }

    fn scan(&self, keep: impl Fn(&StoredAnniversary) -> bool) -> StorageResult<Vec<StoredAnniversary>> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(ANNIVERSARIES)?;

        let mut out = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let anniversary: StoredAnniversary = serde_json::from_slice(value.value())?;
            if keep(&anniversary) {
                out.push(anniversary);
            }
        }
        Ok(out)
    }
}
