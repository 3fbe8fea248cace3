//! Credential registry
//!
//! API keys and the documented endpoint catalog. Keys are never deleted;
//! revoking flips their status and every listing filters on it.

use crate::auth::{fingerprint, generate_key, KeyEnvironment};
use crate::error::{not_found_error, ApiResult, AppError};
use crate::models::{ApiEndpoint, ApiKey, EndpointCategory, KeyStatus};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Thread-safe credential registry
pub struct CredentialRegistry {
    keys: Arc<RwLock<Vec<ApiKey>>>,
    endpoints: Vec<ApiEndpoint>,
    environment: KeyEnvironment,
}

impl CredentialRegistry {
    pub fn with_keys(
        environment: KeyEnvironment,
        keys: Vec<ApiKey>,
        endpoints: Vec<ApiEndpoint>,
    ) -> Self {
        Self {
            keys: Arc::new(RwLock::new(keys)),
            endpoints,
            environment,
        }
    }

    /// Issue a new active key named `name`
    ///
    /// The returned record carries the full key string; listings only ever
    /// show it masked.
    pub async fn generate_api_key(&self, name: &str) -> ApiKey {
        let record = ApiKey {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            key: generate_key(self.environment),
            created_at: Utc::now(),
            last_used: None,
            status: KeyStatus::Active,
        };

        info!(
            "Generated API key '{}' ({}) fingerprint {}",
            record.name,
            record.id,
            fingerprint(&record.key)
        );
        self.keys.write().await.push(record.clone());
        record
    }

    /// Mark a key revoked; repeating the call changes nothing
    pub async fn revoke_api_key(&self, id: &str) -> ApiResult<ApiKey> {
        let mut keys = self.keys.write().await;
        let key = keys
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or_else(|| not_found_error(format!("API key {} not found", id)))?;

        if key.status != KeyStatus::Revoked {
            key.status = KeyStatus::Revoked;
            info!("Revoked API key '{}' ({})", key.name, key.id);
        }
        Ok(key.clone())
    }

    /// Active keys in insertion order
    pub async fn get_active_api_keys(&self) -> Vec<ApiKey> {
        let keys = self.keys.read().await;
        keys.iter().filter(|k| k.is_active()).cloned().collect()
    }

    /// Every key, revoked ones included
    pub async fn list_api_keys(&self) -> Vec<ApiKey> {
        self.keys.read().await.clone()
    }

    /// Look up an active key by its secret and stamp `lastUsed`
    pub async fn verify_api_key(&self, key: &str) -> ApiResult<ApiKey> {
        let mut keys = self.keys.write().await;
        let record = keys.iter_mut().find(|k| k.key == key).ok_or_else(|| {
            warn!("Rejected unknown API key {}", fingerprint(key));
            AppError::Unauthorized("Unknown API key".to_string())
        })?;

        if !record.is_active() {
            warn!("Rejected revoked API key '{}' ({})", record.name, record.id);
            return Err(AppError::Unauthorized("API key has been revoked".to_string()));
        }

        record.last_used = Some(Utc::now());
        Ok(record.clone())
    }

    /// Documented endpoints, optionally limited to one category
    pub fn list_endpoints(&self, category: Option<EndpointCategory>) -> Vec<ApiEndpoint> {
        self.endpoints
            .iter()
            .filter(|e| category.map_or(true, |c| e.category == c))
            .cloned()
            .collect()
    }

    pub fn environment(&self) -> KeyEnvironment {
        self.environment
    }
}
