//! User and authentication DTOs.

use serde::{Deserialize, Serialize};

/// Minimal author info embedded in revisions and comments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Full user profile as returned by `/auth/profile` and `/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl User {
    /// Name to show for this user; falls back to the email's local part.
    pub fn display_name(&self) -> &str {
        if !self.username.trim().is_empty() {
            &self.username
        } else {
            self.email.split('@').next().unwrap_or(&self.email)
        }
    }
}

/// Body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    #[serde(rename = "loginIdentifier")]
    pub login_identifier: String,
    pub password: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}
