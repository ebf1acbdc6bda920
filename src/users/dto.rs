use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::models::User;

time::serde::format_description!(date_iso8601, Date, "[year]-[month]-[day]");

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub fullname: String,
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub address: String,
    #[serde(with = "date_iso8601")]
    pub date_of_birth: Date,
    #[serde(default)]
    pub facebook_account_id: i64,
    #[serde(default)]
    pub google_account_id: i64,
    pub role_id: i64,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
    pub role_id: i64,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Public part of the user returned to clients.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub fullname: String,
    pub phone_number: String,
    pub role_id: i64,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            phone_number: user.phone_number,
            role_id: user.role_id,
        }
    }
}
