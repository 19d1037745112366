// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Couple Space - shared space backend for two
//!
//! This crate provides user accounts and shared anniversary records behind
//! stateless bearer-token authentication.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuing, validation and request authentication (HS256 JWT)
//! - `calendar` - Yearly recurrence arithmetic
//! - `storage` - Embedded database (redb)

pub mod api;
pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
