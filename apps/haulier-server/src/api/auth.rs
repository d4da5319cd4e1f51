//! Authentication API endpoints.

use api_protocol::{requests::*, responses::*};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::error::ServerResult;
use crate::extract::ApiJson;
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

/// Registers a user.
pub async fn register(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ServerResult<(StatusCode, Json<UserResponse>)> {
    let user = state.auth.register(&request.email, &request.password).await?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// Exchanges credentials for a bearer token.
pub async fn login(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ServerResult<Json<TokenResponse>> {
    let token = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(token))
}

/// Gets the current user.
pub async fn me(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<UserResponse>> {
    let user = state.auth.current_user(user.id).await?;
    Ok(Json(UserResponse { user }))
}
