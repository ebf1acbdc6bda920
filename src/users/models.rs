use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub phone_number: String, // unique, used as the login handle
    #[serde(skip_serializing)]
    pub password_hash: Option<String>, // NULL for federated accounts
    pub address: String,
    pub date_of_birth: Date,
    pub facebook_account_id: i64, // 0 = not linked
    pub google_account_id: i64,   // 0 = not linked
    pub is_active: bool,
    pub role_id: i64,
    pub created_at: OffsetDateTime,
}

impl User {
    /// A local password exists only when no federated account is linked.
    pub fn has_local_password(&self) -> bool {
        self.facebook_account_id == 0 && self.google_account_id == 0
    }
}

/// Permission tier referenced by every user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

impl Role {
    pub const ADMIN: &'static str = "ADMIN";

    pub fn is_admin(&self) -> bool {
        self.name.to_uppercase() == Self::ADMIN
    }
}

/// Registration payload as accepted by the service layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fullname: String,
    pub phone_number: String,
    pub password: String,
    pub address: String,
    pub date_of_birth: Date,
    pub facebook_account_id: i64,
    pub google_account_id: i64,
    pub role_id: i64,
}
