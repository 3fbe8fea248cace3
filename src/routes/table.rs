//! Table management route handlers
//!
//! Tables are always addressed through their owning database.

use crate::error::{validation_error, ApiResult};
use crate::models::{
    CreateTableRequest, MessageResponse, ParseSqlRequest, SuccessResponse, Table, TableUpdate,
};
use crate::schema::parse_create_table;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use validator::Validate;

/// GET /api/v1/databases/{id}/tables
pub async fn list_tables(
    State(state): State<SharedState>,
    Path(database_id): Path<String>,
) -> ApiResult<Json<SuccessResponse<Vec<Table>>>> {
    let tables = state.schemas.list_tables(&database_id).await?;

    Ok(Json(SuccessResponse::with_data(
        "Tables fetched successfully.",
        tables,
    )))
}

/// POST /api/v1/databases/{id}/tables
pub async fn create_table(
    State(state): State<SharedState>,
    Path(database_id): Path<String>,
    Json(payload): Json<CreateTableRequest>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<Table>>)> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    debug!("Creating table {} with {} columns", payload.name, payload.columns.len());
    let table = state
        .schemas
        .add_table(&database_id, payload.into_table())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            format!("Table '{}' created successfully.", table.name),
            table,
        )),
    ))
}

/// POST /api/v1/databases/{id}/sql
pub async fn import_table(
    State(state): State<SharedState>,
    Path(database_id): Path<String>,
    Json(payload): Json<ParseSqlRequest>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<Table>>)> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let table = parse_create_table(&payload.sql)?;
    let table = state.schemas.add_table(&database_id, table).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            format!("Table '{}' imported with {} columns.", table.name, table.columns.len()),
            table,
        )),
    ))
}

/// PUT /api/v1/databases/{id}/tables/{table_id}
pub async fn update_table(
    State(state): State<SharedState>,
    Path((database_id, table_id)): Path<(String, String)>,
    Json(payload): Json<TableUpdate>,
) -> ApiResult<Json<SuccessResponse<Table>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let table = state
        .schemas
        .update_table(&database_id, &table_id, payload)
        .await?;

    Ok(Json(SuccessResponse::with_data(
        "Table updated successfully.",
        table,
    )))
}

/// DELETE /api/v1/databases/{id}/tables/{table_id}
pub async fn delete_table(
    State(state): State<SharedState>,
    Path((database_id, table_id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let removed = state.schemas.delete_table(&database_id, &table_id).await?;

    Ok(Json(MessageResponse::new(format!(
        "Table '{}' deleted successfully.",
        removed.name
    ))))
}
