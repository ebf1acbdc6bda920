use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::messages;

/// Failures surfaced by the user service.
#[derive(Debug, Error)]
pub enum UserError {
    /// The phone number is already registered.
    #[error("{}", messages::PHONE_NUMBER_EXISTS)]
    PhoneNumberTaken,

    /// The requested role id does not resolve.
    #[error("{}", messages::ROLE_NOT_FOUND)]
    RoleNotFound,

    /// Self-registration tried to claim the administrator tier.
    #[error("{}", messages::REGISTER_ADMIN_FORBIDDEN)]
    AdminRegistration,

    /// Phone number or password did not match. Deliberately does not say
    /// which factor failed.
    #[error("{}", messages::WRONG_PHONE_PASSWORD)]
    InvalidCredentials,

    /// The claimed role id is unknown or is not the user's assigned role.
    #[error("{}", messages::ROLE_DOES_NOT_EXIST)]
    RoleMismatch,

    /// Credentials were fine but the account is deactivated.
    #[error("{}", messages::USER_IS_LOCKED)]
    AccountLocked,

    #[error("{}", messages::USER_NOT_FOUND)]
    UserNotFound,

    /// Request body failed validation before reaching the service.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UserError {
    pub fn status(&self) -> StatusCode {
        match self {
            UserError::PhoneNumberTaken => StatusCode::CONFLICT,
            UserError::RoleNotFound | UserError::UserNotFound => StatusCode::NOT_FOUND,
            UserError::AdminRegistration | UserError::AccountLocked => StatusCode::FORBIDDEN,
            UserError::InvalidCredentials | UserError::RoleMismatch => StatusCode::UNAUTHORIZED,
            UserError::Validation(_) => StatusCode::BAD_REQUEST,
            UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        // Internal detail stays in the logs, never in the body.
        if let UserError::Internal(e) = &self {
            error!(error = %e, "internal error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal server error" })),
            )
                .into_response();
        }

        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}
