use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload attached to every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,            // user ID
    pub phone_number: String, // login handle
    pub role: String,         // role name, e.g. "USER"
    pub iat: usize,           // issued at (unix timestamp)
    pub exp: usize,           // expires at (unix timestamp)
    pub iss: String,          // issuer
    pub aud: String,          // audience
}
