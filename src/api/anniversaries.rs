// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use tracing::info;

use super::run_blocking;
use crate::{
    auth::{Auth, AuthError, AuthenticatedIdentity},
    calendar,
    error::ApiError,
    models::{Anniversary, ApiResponse, CreateAnniversaryRequest, NextAnniversary, STATE_SUCCESS},
    state::AppState,
    storage::{NewAnniversary, StorageError, StoredAnniversary, StoredUser},
};

pub const ANNIVERSARY_NOT_FOUND: &str = "Anniversary not found";

/// Local calendar date used for "days remaining".
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn not_found_as_404(err: StorageError) -> ApiError {
    match err {
        StorageError::NotFound(_) => ApiError::not_found(ANNIVERSARY_NOT_FOUND),
        other => other.into(),
    }
}

/// The stored account behind an identity. A missing account means the token
/// outlived the user.
fn owner(state: &AppState, identity: &AuthenticatedIdentity) -> Result<StoredUser, ApiError> {
    state
        .db
        .users()
        .find_by_username(&identity.principal)?
        .ok_or_else(|| AuthError::UnknownSubject.into())
}

#[utoipa::path(
    get,
    path = "/api/anniversary/list",
    tag = "Anniversaries",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [Anniversary]))
)]
pub async fn list_anniversaries(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Anniversary>>>, ApiError> {
    let stored = run_blocking(move || Ok(state.db.anniversaries().list_all()?)).await?;
    let today = today();
    let anniversaries = stored
        .into_iter()
        .map(|a| Anniversary::from_stored(a, today))
        .collect();
    Ok(Json(ApiResponse::success(anniversaries)))
}

#[utoipa::path(
    get,
    path = "/api/anniversary/mine",
    tag = "Anniversaries",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [Anniversary]))
)]
pub async fn list_my_anniversaries(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Result<Json<ApiResponse<Vec<Anniversary>>>, ApiError> {
    let stored = run_blocking(move || {
        let user = owner(&state, &identity)?;
        Ok(state.db.anniversaries().list_by_user(user.id)?)
    })
    .await?;
    let today = today();
    let anniversaries = stored
        .into_iter()
        .map(|a| Anniversary::from_stored(a, today))
        .collect();
    Ok(Json(ApiResponse::success(anniversaries)))
}

#[utoipa::path(
    post,
    path = "/api/anniversary/add",
    request_body = CreateAnniversaryRequest,
    tag = "Anniversaries",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Anniversary),
        (status = 400, description = "Missing name or date"),
        (status = 401, description = "No valid bearer token")
    )
)]
pub async fn add_anniversary(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Json(request): Json<CreateAnniversaryRequest>,
) -> Result<Json<ApiResponse<Anniversary>>, ApiError> {
    let name = match request.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(ApiError::bad_request("Anniversary name is required")),
    };
    let Some(date) = request.date else {
        return Err(ApiError::bad_request("Anniversary date is required"));
    };

    let today = today();
    let created = run_blocking(move || {
        let user = owner(&state, &identity)?;
        let new = NewAnniversary {
            user_id: user.id,
            name,
            date,
            description: request.description,
            remind: request.remind,
            remind_time: request.remind_time,
        };
        Ok(state.db.anniversaries().create(new, today)?)
    })
    .await?;

    info!(id = created.id, user_id = created.user_id, "Anniversary added");
    Ok(Json(ApiResponse::success(Anniversary::from_stored(created, today))))
}

#[utoipa::path(
    get,
    path = "/api/anniversary/detail/{id}",
    params(("id" = u64, Path, description = "Anniversary id")),
    tag = "Anniversaries",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Anniversary),
        (status = 404, description = "Anniversary not found")
    )
)]
pub async fn anniversary_detail(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<Anniversary>>, ApiError> {
    let stored = run_blocking(move || state.db.anniversaries().get(id).map_err(not_found_as_404)).await?;
    Ok(Json(ApiResponse::success(Anniversary::from_stored(stored, today()))))
}

#[utoipa::path(
    delete,
    path = "/api/anniversary/delete/{id}",
    params(("id" = u64, Path, description = "Anniversary id")),
    tag = "Anniversaries",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Anniversary not found")
    )
)]
pub async fn delete_anniversary(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    run_blocking(move || state.db.anniversaries().delete(id).map_err(not_found_as_404)).await?;
    info!(id, "Anniversary deleted");
    Ok(Json(ApiResponse::empty()))
}

#[utoipa::path(
    get,
    path = "/api/anniversary/next",
    tag = "Anniversaries",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Soonest anniversary, or null data", body = NextAnniversary))
)]
pub async fn next_anniversary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<NextAnniversary>>, ApiError> {
    let stored = run_blocking(move || Ok(state.db.anniversaries().list_all()?)).await?;
    Ok(Json(match soonest(&stored, today()) {
        Some(next) => ApiResponse::success(next),
        None => ApiResponse::empty(),
    }))
}

/// The anniversary whose next occurrence is closest to `today`.
///
/// Ties go to the earliest entry in `anniversaries`.
pub fn soonest(anniversaries: &[StoredAnniversary], today: NaiveDate) -> Option<NextAnniversary> {
    let mut best: Option<(&StoredAnniversary, i64)> = None;
    for anniversary in anniversaries {
        let days = calendar::days_until_next(anniversary.date, today);
        if best.is_none_or(|(_, best_days)| days < best_days) {
            best = Some((anniversary, days));
        }
    }

    best.map(|(anniversary, days)| NextAnniversary {
        title: anniversary.name.clone(),
        days,
        state: STATE_SUCCESS.to_string(),
    })
}
