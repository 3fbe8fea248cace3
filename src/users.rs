//! User management module
//!
//! Ordered in-memory roster. Removal is a terminal status flag; there is no
//! restore, and removed users can still be edited.

use crate::auth::Role;
use crate::error::{conflict_error, not_found_error, ApiResult, AppError};
use crate::models::{AppUser, PasswordResetRequest, UserStatus, UserUpdate};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Thread-safe user registry
pub struct UserRegistry {
    users: Arc<RwLock<Vec<AppUser>>>,
    password_resets: Arc<RwLock<Vec<PasswordResetRequest>>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    pub fn with_users(users: Vec<AppUser>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
            password_resets: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append a user; its id must not be taken
    pub async fn add_user(&self, user: AppUser) -> ApiResult<AppUser> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id == user.id) {
            return Err(conflict_error(format!("User {} already exists", user.id)));
        }

        info!("Added user {} ({}) as {}", user.username, user.id, user.role);
        users.push(user.clone());
        Ok(user)
    }

    /// Find user by ID
    pub async fn get_user(&self, id: &str) -> ApiResult<AppUser> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| user_not_found(id))
    }

    /// Every user, removed ones included
    pub async fn list_users(&self) -> Vec<AppUser> {
        self.users.read().await.clone()
    }

    /// Active users whose username or email contains `term`
    pub async fn search_users(&self, term: &str) -> Vec<AppUser> {
        let users = self.users.read().await;
        users
            .iter()
            .filter(|u| u.is_active() && u.matches(term))
            .cloned()
            .collect()
    }

    /// Merge the patch into the matching user
    pub async fn update_user(&self, id: &str, updates: UserUpdate) -> ApiResult<AppUser> {
        self.modify(id, |user| {
            if let Some(first_name) = updates.first_name {
                user.first_name = first_name;
            }
            if let Some(last_name) = updates.last_name {
                user.last_name = last_name;
            }
            if let Some(username) = updates.username {
                user.username = username;
            }
            if let Some(email) = updates.email {
                user.email = email;
            }
            if let Some(role) = updates.role {
                user.role = role;
            }
            if let Some(last_login) = updates.last_login {
                user.last_login = Some(last_login);
            }
        })
        .await
    }

    /// Soft-delete: flag the user as removed
    pub async fn remove_user(&self, id: &str) -> ApiResult<AppUser> {
        let user = self
            .modify(id, |user| user.status = UserStatus::Removed)
            .await?;
        info!("Removed user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Overwrite the role, whatever the user's status
    pub async fn change_user_role(&self, id: &str, role: Role) -> ApiResult<AppUser> {
        let user = self.modify(id, |user| user.role = role).await?;
        info!("Changed role of {} ({}) to {}", user.username, user.id, role);
        Ok(user)
    }

    /// Record a password reset request; no credential changes, no email
    pub async fn reset_user_password(&self, id: &str) -> ApiResult<PasswordResetRequest> {
        let user = self.get_user(id).await?;
        let request = PasswordResetRequest {
            user_id: user.id.clone(),
            requested_at: Utc::now(),
        };

        info!("Password reset initiated for user {} <{}>", user.id, user.email);
        self.password_resets.write().await.push(request.clone());
        Ok(request)
    }

    /// Recorded reset requests, oldest first
    pub async fn password_resets(&self) -> Vec<PasswordResetRequest> {
        self.password_resets.read().await.clone()
    }

    async fn modify<F>(&self, id: &str, apply: F) -> Result<AppUser, AppError>
    where
        F: FnOnce(&mut AppUser),
    {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| user_not_found(id))?;

        apply(user);
        Ok(user.clone())
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn user_not_found(id: &str) -> AppError {
    not_found_error(format!("User {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleCounts;
    use crate::seed;
    use pretty_assertions::assert_eq;

    fn seeded() -> UserRegistry {
        UserRegistry::with_users(seed::users())
    }

    #[tokio::test]
    async fn test_remove_is_soft() {
        let registry = seeded();

        let removed = registry.remove_user("user1").await.unwrap();
        assert_eq!(removed.status, UserStatus::Removed);

        assert_eq!(registry.list_users().await.len(), 3);
        assert_eq!(
            registry.get_user("user1").await.unwrap().status,
            UserStatus::Removed
        );
    }

    #[tokio::test]
    async fn test_role_change_applies_to_removed_user() {
        let registry = seeded();
        registry.remove_user("user1").await.unwrap();

        let user = registry.change_user_role("user1", Role::Admin).await.unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.status, UserStatus::Removed);
    }

    #[tokio::test]
    async fn test_update_user_merges_only_patched_fields() {
        let registry = seeded();
        let before = registry.get_user("user2").await.unwrap();

        let after = registry
            .update_user(
                "user2",
                UserUpdate {
                    first_name: Some("Sarah".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(after.first_name, "Sarah");
        assert_eq!(after.last_name, before.last_name);
        assert_eq!(after.email, before.email);
        assert_eq!(after.role, before.role);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_search_skips_removed_users() {
        let registry = seeded();

        assert_eq!(registry.search_users("").await.len(), 3);
        assert_eq!(registry.search_users("COMPANY.COM").await.len(), 2);

        registry.remove_user("user2").await.unwrap();
        let found: Vec<String> = registry
            .search_users("company")
            .await
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(found, vec!["user1"]);
    }

    #[tokio::test]
    async fn test_reset_password_records_intent() {
        let registry = seeded();
        let before = registry.get_user("admin").await.unwrap();

        let request = registry.reset_user_password("admin").await.unwrap();
        assert_eq!(request.user_id, "admin");
        assert_eq!(registry.password_resets().await, vec![request]);
        assert_eq!(registry.get_user("admin").await.unwrap(), before);

        assert!(matches!(
            registry.reset_user_password("ghost").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_and_duplicate_ids() {
        let registry = seeded();
        assert!(matches!(
            registry.remove_user("ghost").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            registry.change_user_role("ghost", Role::Admin).await,
            Err(AppError::NotFound(_))
        ));

        let duplicate = registry.get_user("admin").await.unwrap();
        assert!(matches!(
            registry.add_user(duplicate).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_role_counts() {
        let registry = seeded();
        let counts = RoleCounts::of(&registry.search_users("").await);
        assert_eq!(
            counts,
            RoleCounts {
                total: 3,
                admins: 1,
                users: 2
            }
        );
    }
}
