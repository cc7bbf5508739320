//! Feed account handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{AuthResponse, LoginRequest, SignupRequest};
use crate::services::auth;

/// `POST /signup` — create a feed member and return a session.
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let resp = auth::signup(
        &state.members,
        &state.tokens,
        &body.name,
        &body.email,
        &body.password,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `POST /login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = auth::login(&state.members, &state.tokens, &body.email, &body.password).await?;
    Ok(Json(resp))
}
