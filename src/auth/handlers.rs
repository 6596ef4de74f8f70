use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::auth::dto::{AuthResponse, LoginRequest, SignupRequest};
use crate::auth::repo::Role;
use crate::auth::service;
use crate::error::ApiError;
use crate::state::AppState;

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/admin/signup", post(admin_signup))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let (user, token) = service::create_account(
        &state,
        &payload.name,
        &payload.email,
        &payload.password,
        Role::User,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User account created successfully",
            user: user.into(),
            token,
        }),
    ))
}

/// Grants the admin role to anyone who knows the endpoint. Faithful to the
/// upstream API; gate it at the deployment layer before exposing publicly.
#[instrument(skip(state, payload))]
async fn admin_signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    warn!(email = %payload.email, "ungated admin signup requested");
    let (user, token) = service::create_account(
        &state,
        &payload.name,
        &payload.email,
        &payload.password,
        Role::Admin,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Admin account created successfully",
            user: user.into(),
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, token) = service::login(&state, &payload.email, &payload.password).await?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        user: user.into(),
        token,
    }))
}
