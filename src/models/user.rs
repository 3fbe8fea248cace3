//! Application user models and DTOs

use crate::auth::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Roster status; removal is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Removed,
}

/// Dashboard user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    pub id: String,
    #[serde(rename = "first_name")]
    pub first_name: String,
    #[serde(rename = "last_name")]
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl AppUser {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Case-insensitive match on username or email
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.username.to_lowercase().contains(&term) || self.email.to_lowercase().contains(&term)
    }
}

/// Partial user update; present fields overwrite, absent ones stay
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(rename = "first_name")]
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[serde(rename = "last_name")]
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub role: Option<Role>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Request to add a user to the roster
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub last_name: String,
    #[validate(length(min = 1, max = 50, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl CreateUserRequest {
    pub fn into_user(self) -> AppUser {
        AppUser {
            id: Uuid::new_v4().to_string(),
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            email: self.email,
            role: self.role,
            status: UserStatus::Active,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub search: Option<String>,
}

/// Recorded password reset intent; nothing is rotated or mailed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub user_id: String,
    pub requested_at: DateTime<Utc>,
}

/// Role totals for the admin roster header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    pub total: usize,
    pub admins: usize,
    pub users: usize,
}

impl RoleCounts {
    pub fn of(users: &[AppUser]) -> Self {
        let admins = users.iter().filter(|u| u.role == Role::Admin).count();
        Self {
            total: users.len(),
            admins,
            users: users.len() - admins,
        }
    }
}

/// Roster listing with its header totals
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<AppUser>,
    pub counts: RoleCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_json_field_names() {
        let user = CreateUserRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            role: Role::Admin,
        }
        .into_user();

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["first_name"], "Ada");
        assert_eq!(json["last_name"], "Lovelace");
        assert_eq!(json["role"], "admin");
        assert_eq!(json["status"], "active");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("lastLogin").is_none());
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let user = CreateUserRequest {
            first_name: "Ada".into(),
            last_name: String::new(),
            username: "AdaL".into(),
            email: "ada@Example.com".into(),
            role: Role::User,
        }
        .into_user();

        assert!(user.matches("adal"));
        assert!(user.matches("EXAMPLE"));
        assert!(!user.matches("grace"));
    }
}
