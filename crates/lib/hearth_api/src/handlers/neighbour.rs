//! Neighbourhood handlers: accounts and the help request lifecycle.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    AssignRequest, AuthResponse, ClaimRewardRequest, ClaimRewardResponse, ConfirmRequest,
    CreateHelpRequest, CreateHelpRequestResponse, HelpRequestResponse, HelperQuery,
    HelperRequestsResponse, LoginRequest, NeighbourSignupRequest, RequestUpdateResponse,
};
use crate::services::neighbour;

fn require(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} required")));
    }
    Ok(())
}

/// `POST /api/signup`
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(body): Json<NeighbourSignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let resp = neighbour::signup(&state.neighbours, &state.tokens, body).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `POST /api/signin`
pub async fn signin_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp =
        neighbour::signin(&state.neighbours, &state.tokens, &body.email, &body.password).await?;
    Ok(Json(resp))
}

/// `POST /api/upload` — an elder asks for help.
pub async fn upload_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateHelpRequest>,
) -> AppResult<(StatusCode, Json<CreateHelpRequestResponse>)> {
    let resp = neighbour::create_help_request(
        &state.requests,
        &state.neighbours,
        state.ai.transcriber.as_ref(),
        body,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `GET /api/helper?helperId=`
pub async fn helper_requests_handler(
    State(state): State<AppState>,
    Query(query): Query<HelperQuery>,
) -> AppResult<Json<HelperRequestsResponse>> {
    require(&query.helper_id, "helperId")?;
    let requests = state.requests.list_for_helper(&query.helper_id).await?;
    Ok(Json(HelperRequestsResponse {
        requests: requests.into_iter().map(HelpRequestResponse::from).collect(),
    }))
}

/// `POST /api/assignRequest`
pub async fn assign_handler(
    State(state): State<AppState>,
    Json(body): Json<AssignRequest>,
) -> AppResult<Json<RequestUpdateResponse>> {
    require(&body.request_id, "requestId")?;
    require(&body.helper_id, "helperId")?;
    let request = state.requests.assign(&body.request_id, &body.helper_id).await?;
    Ok(Json(RequestUpdateResponse {
        message: "Request assigned successfully".into(),
        request: request.into(),
    }))
}

/// `POST /api/eld-people/confirm`
pub async fn confirm_handler(
    State(state): State<AppState>,
    Json(body): Json<ConfirmRequest>,
) -> AppResult<Json<RequestUpdateResponse>> {
    require(&body.request_id, "requestId")?;
    let request = state.requests.confirm(&body.request_id).await?;
    Ok(Json(RequestUpdateResponse {
        message: "Request confirmed successfully".into(),
        request: request.into(),
    }))
}

/// `POST /api/reward/claim`
pub async fn claim_reward_handler(
    State(state): State<AppState>,
    Json(body): Json<ClaimRewardRequest>,
) -> AppResult<Json<ClaimRewardResponse>> {
    require(&body.helper_id, "helperId")?;
    require(&body.request_id, "requestId")?;
    let new_balance = state
        .requests
        .claim_reward(&body.helper_id, &body.request_id)
        .await?;
    Ok(Json(ClaimRewardResponse {
        message: "Reward claimed successfully".into(),
        new_balance,
    }))
}
