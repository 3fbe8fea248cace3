//! Authentication middleware
//!
//! Accepts requests carrying an active API key as a bearer token.

use crate::auth::fingerprint;
use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::debug;

/// Reject requests without an active API key
///
/// A successful check stamps the key's `lastUsed` and stores the key record
/// in the request extensions.
pub async fn api_key_middleware(
    State(state): State<SharedState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer
        .ok_or_else(|| AppError::Unauthorized("Missing API key".to_string()))?;

    let api_key = state
        .credentials
        .verify_api_key(bearer.token())
        .await
        .map_err(|_| AppError::Unauthorized("Invalid or revoked API key".to_string()))?;

    debug!("Request authorized with key {}", fingerprint(&api_key.key));

    request.extensions_mut().insert(api_key);

    Ok(next.run(request).await)
}
