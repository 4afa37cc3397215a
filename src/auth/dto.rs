use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::User;

/// Request body for user registration. Fields default to empty so a missing
/// field and an empty one fail the same presence check.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public part of the user returned on register and login.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

/// Public user shape for profile and listing, which also expose the creation
/// time. The password hash is never part of any response type.
#[derive(Debug, Serialize)]
pub struct ProfileUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&User> for ProfileUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            created_at: user.created_at,
        }
    }
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: ProfileUser,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub message: String,
    #[serde(rename = "totalUsers")]
    pub total_users: usize,
    pub users: Vec<ProfileUser>,
}

#[derive(Debug, Serialize)]
pub struct DbTestResponse {
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}
