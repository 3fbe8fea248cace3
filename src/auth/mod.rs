//! Authentication and authorization module
//!
//! Provides user roles, API key material, and bearer-key enforcement.

mod keys;
mod middleware;

pub use keys::{fingerprint, generate_key, mask_key, KeyEnvironment};
#[cfg(test)]
pub use keys::KEY_SUFFIX_LEN;
pub use middleware::api_key_middleware;

use serde::{Deserialize, Serialize};

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees every database and manages the user roster
    Admin,
    /// Sees only the databases it owns
    User,
}

impl Role {
    pub fn sees_all_databases(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}
