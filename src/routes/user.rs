//! User roster route handlers
//!
//! DELETE only flags the user as removed; the record stays listed.

use crate::error::{validation_error, ApiResult};
use crate::models::{
    AppUser, ChangeRoleRequest, CreateUserRequest, Database, PasswordResetRequest, RoleCounts,
    SuccessResponse, UserListResponse, UserQuery, UserUpdate,
};
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

/// GET /api/v1/users?search=
///
/// With `search`, only active users matching the term; otherwise everyone.
pub async fn list_users(
    State(state): State<SharedState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<SuccessResponse<UserListResponse>>> {
    let users = match query.search.as_deref() {
        Some(term) => state.users.search_users(term).await,
        None => state.users.list_users().await,
    };
    let counts = RoleCounts::of(&users);

    Ok(Json(SuccessResponse::with_data(
        format!("{} users found.", users.len()),
        UserListResponse { users, counts },
    )))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<SharedState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<AppUser>>)> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let user = state.users.add_user(payload.into_user()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            format!("User {} added.", user.username),
            user,
        )),
    ))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<AppUser>>> {
    let user = state.users.get_user(&id).await?;

    Ok(Json(SuccessResponse::with_data(
        "User retrieved successfully.",
        user,
    )))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> ApiResult<Json<SuccessResponse<AppUser>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let user = state.users.update_user(&id, payload).await?;

    Ok(Json(SuccessResponse::with_data(
        "User updated successfully.",
        user,
    )))
}

/// DELETE /api/v1/users/{id}
pub async fn remove_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<AppUser>>> {
    let user = state.users.remove_user(&id).await?;

    Ok(Json(SuccessResponse::with_data(
        format!("{} has been removed from the system.", user.username),
        user,
    )))
}

/// PUT /api/v1/users/{id}/role
pub async fn change_role(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<ChangeRoleRequest>,
) -> ApiResult<Json<SuccessResponse<AppUser>>> {
    let user = state.users.change_user_role(&id, payload.role).await?;

    Ok(Json(SuccessResponse::with_data(
        format!("{} is now {}.", user.username, user.role),
        user,
    )))
}

/// POST /api/v1/users/{id}/reset-password
pub async fn reset_password(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<PasswordResetRequest>>)> {
    let request = state.users.reset_user_password(&id).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SuccessResponse::with_data(
            "Password reset requested.",
            request,
        )),
    ))
}

/// GET /api/v1/users/{id}/databases
///
/// Admins see every database; other users only the ones they own.
pub async fn visible_databases(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<Vec<Database>>>> {
    let user = state.users.get_user(&id).await?;
    let databases = state.schemas.visible_databases(&user).await;

    Ok(Json(SuccessResponse::with_data(
        format!("{} databases visible to {}.", databases.len(), user.username),
        databases,
    )))
}

/// GET /api/v1/password-resets
pub async fn list_password_resets(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<Vec<PasswordResetRequest>>>> {
    let requests = state.users.password_resets().await;

    Ok(Json(SuccessResponse::with_data(
        format!("{} password reset requests.", requests.len()),
        requests,
    )))
}
