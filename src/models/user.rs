//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization role. The set is closed; the stored form is the canonical
/// value ("admin", "manager", "employee", "user").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "administrator")]
    Admin,
    Manager,
    Employee,
    #[serde(rename = "user", alias = "standard-user")]
    #[sqlx(rename = "user")]
    StandardUser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
            Role::StandardUser => "user",
        }
    }

    /// Parse a role from either its symbolic name or its canonical value,
    /// case-insensitively. Legacy clients send both forms; they must be
    /// treated as equivalent.
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "admin" | "administrator" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "employee" => Some(Role::Employee),
            "user" | "standarduser" | "standard-user" => Some(Role::StandardUser),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account. `password_hash` is opaque and never serialized out.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// User response (no sensitive data)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            role: user.role,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

/// Create user request (admin provisioning)
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Self-service registration request; role is always `user`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Role change request
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub username: String,
    pub role: Role,
}

/// Administrative password reset request
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub username: String,
    pub new_password: String,
}
