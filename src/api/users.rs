// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use tracing::{info, warn};

use super::run_blocking;
use crate::{
    auth::{Auth, Credential, Verification},
    error::ApiError,
    models::{ApiResponse, LoginResponse, UserCredentials, UserDto, UserMeResponse},
    state::AppState,
    storage::StorageError,
};

pub const USERNAME_TAKEN: &str = "Username already exists";
pub const UNKNOWN_USER: &str = "User does not exist";
pub const WRONG_PASSWORD: &str = "Incorrect password";

#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = UserCredentials,
    tag = "Users",
    responses(
        (status = 200, description = "Account created", body = UserDto),
        (status = 400, description = "Blank username or password"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<UserCredentials>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    if request.username.trim().is_empty() || request.password.trim().is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let user = run_blocking(move || {
        let users = state.db.users();
        if users.exists(&request.username)? {
            return Err(ApiError::conflict(USERNAME_TAKEN));
        }
        let hash = state.passwords.hash(&request.password)?;
        users.create(&request.username, &hash).map_err(|err| match err {
            StorageError::AlreadyExists(_) => ApiError::conflict(USERNAME_TAKEN),
            other => other.into(),
        })
    })
    .await?;

    info!(user_id = user.id, username = %user.username, "User registered");
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = UserCredentials,
    tag = "Users",
    responses(
        (status = 200, description = "Bearer token issued", body = LoginResponse),
        (status = 401, description = "Unknown user or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<UserCredentials>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let username = request.username.clone();
    let lookup = state.clone();
    let (verification, user) = run_blocking(move || {
        let user = lookup.db.users().find_by_username(&request.username)?;
        let verification = lookup
            .verifier
            .verify(user.as_ref().map(Credential::from), &request.password);
        Ok((verification, user))
    })
    .await?;

    let user = match (verification, user) {
        (Verification::Verified(_), Some(user)) => user,
        (Verification::WrongPassword, _) => {
            warn!(%username, "Login with wrong password");
            return Err(ApiError::unauthorized(WRONG_PASSWORD));
        }
        _ => {
            warn!(%username, "Login for unknown user");
            return Err(ApiError::unauthorized(UNKNOWN_USER));
        }
    };

    let token = state.auth.issuer().issue(&user.username)?;

    info!(user_id = user.id, username = %user.username, "User logged in");
    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        user_info: user.into(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Identity of the caller", body = UserMeResponse),
        (status = 401, description = "No valid bearer token")
    )
)]
pub async fn current_user(Auth(identity): Auth) -> Json<ApiResponse<UserMeResponse>> {
    Json(ApiResponse::success(identity.into()))
}
