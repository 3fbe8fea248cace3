//! API key route handlers
//!
//! Listings always mask the secret; the full key is returned once, at generation.

use crate::error::{validation_error, ApiResult};
use crate::models::{
    ApiEndpoint, ApiKeyView, EndpointQuery, GenerateKeyRequest, GeneratedKeyResponse,
    SuccessResponse, VerifyKeyRequest,
};
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

/// GET /api/v1/keys
pub async fn list_keys(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<Vec<ApiKeyView>>>> {
    let keys: Vec<ApiKeyView> = state
        .credentials
        .list_api_keys()
        .await
        .into_iter()
        .map(ApiKeyView::from)
        .collect();

    Ok(Json(SuccessResponse::with_data(
        format!("{} API keys found.", keys.len()),
        keys,
    )))
}

/// GET /api/v1/keys/active
pub async fn list_active_keys(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<Vec<ApiKeyView>>>> {
    let keys: Vec<ApiKeyView> = state
        .credentials
        .get_active_api_keys()
        .await
        .into_iter()
        .map(ApiKeyView::from)
        .collect();

    Ok(Json(SuccessResponse::with_data(
        format!("{} active API keys.", keys.len()),
        keys,
    )))
}

/// POST /api/v1/keys
pub async fn generate_key(
    State(state): State<SharedState>,
    Json(payload): Json<GenerateKeyRequest>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<GeneratedKeyResponse>>)> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let record = state.credentials.generate_api_key(&payload.name).await;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            "API key generated. Store it now; it will not be shown again.",
            GeneratedKeyResponse {
                id: record.id,
                name: record.name,
                key: record.key,
            },
        )),
    ))
}

/// POST /api/v1/keys/{id}/revoke
pub async fn revoke_key(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<ApiKeyView>>> {
    let key = state.credentials.revoke_api_key(&id).await?;

    Ok(Json(SuccessResponse::with_data(
        format!("API key '{}' has been revoked.", key.name),
        ApiKeyView::from(key),
    )))
}

/// POST /api/v1/auth/verify
pub async fn verify_key(
    State(state): State<SharedState>,
    Json(payload): Json<VerifyKeyRequest>,
) -> ApiResult<Json<SuccessResponse<ApiKeyView>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let key = state.credentials.verify_api_key(&payload.key).await?;

    Ok(Json(SuccessResponse::with_data(
        "API key is valid.",
        ApiKeyView::from(key),
    )))
}

/// GET /api/v1/endpoints?category=
pub async fn list_endpoints(
    State(state): State<SharedState>,
    Query(query): Query<EndpointQuery>,
) -> ApiResult<Json<SuccessResponse<Vec<ApiEndpoint>>>> {
    let endpoints = state.credentials.list_endpoints(query.category);

    Ok(Json(SuccessResponse::with_data(
        "Endpoints fetched successfully.",
        endpoints,
    )))
}
