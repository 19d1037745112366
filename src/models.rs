// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Field names are camelCase on
//! the wire.
//!
//! Every response is wrapped in the [`ApiResponse`] envelope:
//!
//! ```json
//! { "state": "success", "msg": "ok", "data": { ... } }
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{AuthenticatedIdentity, Role};
use crate::storage::{StoredAnniversary, StoredUser};

pub const STATE_SUCCESS: &str = "success";
pub const STATE_FAIL: &str = "fail";
pub const SUCCESS_MESSAGE: &str = "ok";

// =============================================================================
// Envelope
// =============================================================================

/// Uniform response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse<T> {
    /// `success` or `fail`
    pub state: String,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            state: STATE_SUCCESS.to_string(),
            msg: SUCCESS_MESSAGE.to_string(),
            data: Some(data),
        }
    }

    /// Success with `data: null`.
    pub fn empty() -> Self {
        Self {
            state: STATE_SUCCESS.to_string(),
            msg: SUCCESS_MESSAGE.to_string(),
            data: None,
        }
    }

    pub fn fail(msg: impl Into<String>) -> Self {
        Self {
            state: STATE_FAIL.to_string(),
            msg: msg.into(),
            data: None,
        }
    }
}

// =============================================================================
// User Models
// =============================================================================

/// Body of register and login requests.
#[derive(Clone, Deserialize, ToSchema)]
pub struct UserCredentials {
    pub username: String,
    pub password: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: u64,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredUser> for UserDto {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token, valid for 24 hours
    pub token: String,
    pub user_info: UserDto,
}

/// Identity attached to the current request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserMeResponse {
    pub principal: String,
    pub roles: Vec<Role>,
}

impl From<AuthenticatedIdentity> for UserMeResponse {
    fn from(identity: AuthenticatedIdentity) -> Self {
        Self {
            principal: identity.principal,
            roles: identity.roles.into_iter().collect(),
        }
    }
}

// =============================================================================
// Anniversary Models
// =============================================================================

/// Request to create an anniversary.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnniversaryRequest {
    pub name: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub remind: bool,
    #[serde(default)]
    pub remind_time: Option<NaiveDateTime>,
}

/// An anniversary with the days left until its next occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Anniversary {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub remind: bool,
    pub remind_time: Option<NaiveDateTime>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub days_remaining: i64,
}

impl Anniversary {
    pub fn from_stored(stored: StoredAnniversary, today: NaiveDate) -> Self {
        Self {
            days_remaining: crate::calendar::days_until_next(stored.date, today),
            id: stored.id,
            user_id: stored.user_id,
            name: stored.name,
            date: stored.date,
            description: stored.description,
            remind: stored.remind,
            remind_time: stored.remind_time,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

/// The soonest upcoming anniversary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NextAnniversary {
    pub title: String,
    pub days: i64,
    pub state: String,
}
