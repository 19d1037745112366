// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{
        middleware::{authenticate, require_identity},
        Role,
    },
    error::ApiError,
    models::{
        Anniversary, CreateAnniversaryRequest, LoginResponse, NextAnniversary, UserCredentials,
        UserDto, UserMeResponse,
    },
    state::AppState,
};

pub mod anniversaries;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/me", get(users::current_user))
        .route("/anniversary/list", get(anniversaries::list_anniversaries))
        .route("/anniversary/mine", get(anniversaries::list_my_anniversaries))
        .route("/anniversary/add", post(anniversaries::add_anniversary))
        .route(
            "/anniversary/detail/{id}",
            get(anniversaries::anniversary_detail),
        )
        .route(
            "/anniversary/delete/{id}",
            delete(anniversaries::delete_anniversary),
        )
        .route("/anniversary/next", get(anniversaries::next_anniversary));

    let auth = state.auth.clone();

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Layers run bottom-up: CORS first, then request ids and tracing,
        // then the interceptor, then the route gate.
        .layer(from_fn_with_state(auth.clone(), require_identity))
        .layer(from_fn_with_state(auth, authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Run storage or hashing work on the blocking pool.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(error = %e, "Blocking task failed");
        ApiError::internal("Internal server error")
    })?
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::register,
        users::login,
        users::current_user,
        anniversaries::list_anniversaries,
        anniversaries::list_my_anniversaries,
        anniversaries::add_anniversary,
        anniversaries::anniversary_detail,
        anniversaries::delete_anniversary,
        anniversaries::next_anniversary,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            UserCredentials,
            UserDto,
            LoginResponse,
            UserMeResponse,
            Role,
            Anniversary,
            CreateAnniversaryRequest,
            NextAnniversary,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration, login and current identity"),
        (name = "Anniversaries", description = "Shared anniversary records"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;


#[cfg(test)]
mod tests {
    use super::testing::{test_state, test_state_with};
    use super::*;
    use crate::auth::ExemptRoutes;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use chrono::{TimeDelta, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn register_and_login(app: &Router, username: &str) -> String {
        let credentials = json!({"username": username, "password": "pw"});
        let (status, _) = send(app, Method::POST, "/api/users/register", None, Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app, Method::POST, "/api/users/login", None, Some(credentials)).await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn login_token_unlocks_protected_routes() {
        let (state, _dir) = test_state();
        let app = router(state);

        let token = register_and_login(&app, "alice").await;

        let (status, body) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "success");
        assert_eq!(body["data"]["principal"], "alice");
        assert_eq!(body["data"]["roles"], json!(["user"]));
    }

    #[tokio::test]
    async fn login_response_shape() {
        let (state, _dir) = test_state();
        let app = router(state);

        let credentials = json!({"username": "alice", "password": "pw"});
        send(&app, Method::POST, "/api/users/register", None, Some(credentials.clone())).await;
        let (_, body) = send(&app, Method::POST, "/api/users/login", None, Some(credentials)).await;

        assert_eq!(body["msg"], "ok");
        assert_eq!(body["data"]["userInfo"]["username"], "alice");
        assert!(body["data"]["userInfo"]["createdAt"].is_string());
        assert!(body["data"]["userInfo"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn failed_logins_use_fail_envelope() {
        let (state, _dir) = test_state();
        let app = router(state);
        register_and_login(&app, "alice").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({"username": "alice", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"state": "fail", "msg": "Incorrect password", "data": null}));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users/register",
            None,
            Some(json!({"username": "alice", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["msg"], "Username already exists");
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_and_bad_tokens() {
        let (state, _dir) = test_state();
        let expired = state
            .auth
            .issuer()
            .issue_at("alice", Utc::now() - TimeDelta::hours(25))
            .unwrap();
        let app = router(state);
        register_and_login(&app, "alice").await;

        for token in [None, Some(expired.as_str()), Some("a.b.c")] {
            let (status, body) = send(&app, Method::GET, "/api/anniversary/list", token, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{token:?}");
            assert_eq!(body["state"], "fail");
            assert_eq!(body["error_code"], "missing_identity");
        }
    }

    #[tokio::test]
    async fn anniversary_lifecycle() {
        let (state, _dir) = test_state();
        let app = router(state);
        let token = register_and_login(&app, "alice").await;

        let (status, body) = send(&app, Method::GET, "/api/anniversary/next", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], Value::Null);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/anniversary/add",
            Some(&token),
            Some(json!({"name": "Wedding", "date": "2020-09-01", "remind": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["data"]["id"].as_u64().unwrap();
        assert_eq!(body["data"]["userId"], 1);
        assert!(body["data"]["daysRemaining"].is_i64());

        let (_, body) = send(&app, Method::GET, "/api/anniversary/list", Some(&token), None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, Method::GET, "/api/anniversary/mine", Some(&token), None).await;
        assert_eq!(body["data"][0]["name"], "Wedding");

        let (_, body) = send(&app, Method::GET, "/api/anniversary/next", Some(&token), None).await;
        assert_eq!(body["data"]["title"], "Wedding");
        assert_eq!(body["data"]["state"], "success");

        let uri = format!("/api/anniversary/detail/{id}");
        let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Wedding");

        let delete_uri = format!("/api/anniversary/delete/{id}");
        let (status, body) = send(&app, Method::DELETE, &delete_uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"state": "success", "msg": "ok", "data": null}));

        let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "Anniversary not found");
    }

    #[tokio::test]
    async fn public_paths_are_reachable_anonymously() {
        let (state, _dir) = test_state_with(ExemptRoutes::with_public(["/api/anniversary/list"]));
        let app = router(state);

        let (status, body) = send(&app, Method::GET, "/api/anniversary/list", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));

        // Public reads do not open up writes
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/anniversary/add",
            None,
            Some(json!({"name": "Wedding", "date": "2020-09-01"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn health_and_docs_need_no_token() {
        let (state, _dir) = test_state();
        let app = router(state);

        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["database"], "ok");

        let (status, _) = send(&app, Method::GET, "/health/live", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/api-doc/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/users/login"].is_object());
    }

    #[tokio::test]
    async fn cors_preflight_passes_without_token() {
        let (state, _dir) = test_state();
        let app = router(state);

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/anniversary/add")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let (state, _dir) = test_state();
        let app = router(state);

        let request = Request::builder()
            .uri("/health/live")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}
