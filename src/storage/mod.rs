// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage in a single embedded redb file (`space.redb` under
//! `DATA_DIR`).
//!
//! ## Storage Layout
//!
//! ```text
//! users          username -> StoredUser (JSON)
//! anniversaries  id       -> StoredAnniversary (JSON)
//! sequences      name     -> last issued id
//! ```
//!
//! Every write runs in one redb transaction, so a failed request leaves no
//! partial state behind.

pub mod anniversaries;
pub mod database;
pub mod users;

pub use anniversaries::{AnniversaryRepository, NewAnniversary, StoredAnniversary};
pub use database::{Database, StorageError, StorageResult, DATABASE_FILE};
pub use users::{StoredUser, UserRepository};
