// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the per-request authenticated identity.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Fixed validity window of every issued token (24 hours).
pub const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Claims carried in the token payload.
///
/// Timestamps are whole seconds since the Unix epoch, matching the standard
/// `iat`/`exp` claim encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username the token was issued to
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration (`iat` + 24h)
    pub exp: i64,
}

impl Claims {
    /// Build claims for `subject` issued at `issued_at`.
    pub fn new(subject: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject.into(),
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
        }
    }

    /// A token is usable only while `now < exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Identity resolved for a single request.
///
/// Built fresh from a validated token on every request and stored in that
/// request's extensions. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    /// Username of the account
    pub principal: String,
    /// Roles held by the account
    pub roles: BTreeSet<Role>,
}

impl AuthenticatedIdentity {
    /// Identity of a regular account holder.
    pub fn user(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            roles: BTreeSet::from([Role::User]),
        }
    }
}
