//! Application state management
//!
//! Contains the registries shared across all handlers. State is built
//! explicitly at startup and lives until shutdown; nothing is persisted.

use crate::auth::KeyEnvironment;
use crate::credentials::CredentialRegistry;
use crate::schema::SchemaRegistry;
use crate::seed;
use crate::users::UserRegistry;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Databases, tables and columns
    pub schemas: SchemaRegistry,

    /// API keys and the endpoint catalog
    pub credentials: CredentialRegistry,

    /// Dashboard user roster
    pub users: UserRegistry,
}

impl AppState {
    /// Empty registries; the endpoint catalog is still loaded
    pub fn new(environment: KeyEnvironment) -> Self {
        Self {
            schemas: SchemaRegistry::new(),
            credentials: CredentialRegistry::with_keys(environment, Vec::new(), seed::api_endpoints()),
            users: UserRegistry::new(),
        }
    }

    /// Registries loaded with the demo databases, keys and users
    pub fn seeded(environment: KeyEnvironment) -> Self {
        Self {
            schemas: SchemaRegistry::with_databases(seed::databases()),
            credentials: CredentialRegistry::with_keys(
                environment,
                seed::api_keys(),
                seed::api_endpoints(),
            ),
            users: UserRegistry::with_users(seed::users()),
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_state() {
        let state = AppState::seeded(KeyEnvironment::Live);

        let databases = state.schemas.list_databases().await;
        assert_eq!(databases.len(), 1);
        let names: Vec<&str> = databases[0].tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["users", "products"]);

        assert_eq!(state.credentials.get_active_api_keys().await.len(), 2);
        assert_eq!(state.users.search_users("").await.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_state() {
        let state = AppState::new(KeyEnvironment::Test);
        assert_eq!(state.schemas.count().await, 0);
        assert!(state.credentials.list_api_keys().await.is_empty());
        assert!(state.users.list_users().await.is_empty());
        assert_eq!(state.credentials.list_endpoints(None).len(), 5);
    }

    #[tokio::test]
    async fn test_removing_owner_does_not_cascade() {
        let state = AppState::seeded(KeyEnvironment::Live);
        state.users.remove_user("admin").await.unwrap();
        assert_eq!(state.schemas.get_user_databases("admin").await.len(), 1);
    }
}
