//! Database route handlers
//!
//! CRUD over the schema registry plus the schema and dashboard views.

use crate::error::{validation_error, ApiResult};
use crate::models::{
    CreateDatabaseRequest, Database, DatabaseUpdate, MessageResponse, OwnerQuery, SchemaResponse,
    SchemaStats, SuccessResponse,
};
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use validator::Validate;

/// GET /api/v1/databases?owner=
pub async fn list_databases(
    State(state): State<SharedState>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Json<SuccessResponse<Vec<Database>>>> {
    let databases = match query.owner.as_deref() {
        Some(owner) => state.schemas.get_user_databases(owner).await,
        None => state.schemas.list_databases().await,
    };

    debug!("Listed {} databases (owner filter: {:?})", databases.len(), query.owner);

    Ok(Json(SuccessResponse::with_data(
        format!("{} databases found.", databases.len()),
        databases,
    )))
}

/// POST /api/v1/databases
pub async fn create_database(
    State(state): State<SharedState>,
    Json(payload): Json<CreateDatabaseRequest>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<Database>>)> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let database = state.schemas.add_database(payload.into_database()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            format!("Database '{}' created successfully.", database.name),
            database,
        )),
    ))
}

/// GET /api/v1/databases/{id}
pub async fn get_database(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<Database>>> {
    let database = state.schemas.get_database(&id).await?;

    Ok(Json(SuccessResponse::with_data(
        "Database retrieved successfully.",
        database,
    )))
}

/// PUT /api/v1/databases/{id}
pub async fn update_database(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<DatabaseUpdate>,
) -> ApiResult<Json<SuccessResponse<Database>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let database = state.schemas.update_database(&id, payload).await?;

    Ok(Json(SuccessResponse::with_data(
        "Database updated successfully.",
        database,
    )))
}

/// DELETE /api/v1/databases/{id}
pub async fn delete_database(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let removed = state.schemas.delete_database(&id).await?;

    Ok(Json(MessageResponse::new(format!(
        "Database '{}' deleted successfully.",
        removed.name
    ))))
}

/// GET /api/v1/databases/{id}/schema
pub async fn get_schema(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<SchemaResponse>>> {
    let database = state.schemas.get_database(&id).await?;

    Ok(Json(SuccessResponse::with_data(
        "Schema fetched successfully.",
        SchemaResponse::from(database),
    )))
}

/// GET /api/v1/stats?owner=
pub async fn get_stats(
    State(state): State<SharedState>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Json<SuccessResponse<SchemaStats>>> {
    let stats = state.schemas.stats(query.owner.as_deref()).await;

    Ok(Json(SuccessResponse::with_data(
        "Stats fetched successfully.",
        stats,
    )))
}
