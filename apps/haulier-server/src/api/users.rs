//! User management API endpoints.

use api_protocol::{requests::*, responses::*};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::error::ServerResult;
use crate::extract::ApiJson;
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

pub async fn list_users(State(state): State<SharedState>) -> ServerResult<Json<ListUsersResponse>> {
    let users = state.users.list().await?;
    Ok(Json(ListUsersResponse { users }))
}

pub async fn get_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ServerResult<Json<UserResponse>> {
    let user = state.users.get(&id).await?;
    Ok(Json(UserResponse { user }))
}

/// Updates the caller's own account.
pub async fn update_user(
    State(state): State<SharedState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ServerResult<Json<UserResponse>> {
    let user = state.users.update(caller.id, &id, request).await?;
    Ok(Json(UserResponse { user }))
}

/// Deletes the caller's own account.
pub async fn delete_user(
    State(state): State<SharedState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state.users.delete(caller.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
