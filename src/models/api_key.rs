//! API credential and endpoint catalog models

use crate::auth::mask_key;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Credential status; revocation keeps the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    Active,
    Revoked,
}

/// API credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    pub status: KeyStatus,
}

impl ApiKey {
    pub fn is_active(&self) -> bool {
        self.status == KeyStatus::Active
    }
}

/// Listing view of a key with the secret masked
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyView {
    pub id: String,
    pub name: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    pub status: KeyStatus,
}

impl From<ApiKey> for ApiKeyView {
    fn from(key: ApiKey) -> Self {
        Self {
            key: mask_key(&key.key),
            id: key.id,
            name: key.name,
            created_at: key.created_at,
            last_used: key.last_used,
            status: key.status,
        }
    }
}

/// Request to generate a key
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateKeyRequest {
    #[validate(length(min = 1, max = 100, message = "Key name must be between 1 and 100 characters"))]
    pub name: String,
}

/// Response to a key generation; the only time the full key is returned
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedKeyResponse {
    pub id: String,
    pub name: String,
    pub key: String,
}

/// Request to verify a key
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyKeyRequest {
    #[validate(length(min = 1, message = "Key is required"))]
    pub key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointCategory {
    Database,
    Auth,
    Storage,
}

/// Entry in the documented endpoint catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
    pub id: String,
    pub method: HttpMethod,
    pub url: String,
    pub description: String,
    pub category: EndpointCategory,
}

#[derive(Debug, Default, Deserialize)]
pub struct EndpointQuery {
    pub category: Option<EndpointCategory>,
}
