use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::AdminUser;
use crate::error::UserError;
use crate::state::AppState;

use super::dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest};
use super::models::NewUser;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/block/:id", put(block))
}

fn is_valid_phone_number(phone_number: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{8,15}$").unwrap();
    }
    PHONE_RE.is_match(phone_number)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), UserError> {
    payload.phone_number = payload.phone_number.trim().to_string();

    if !is_valid_phone_number(&payload.phone_number) {
        warn!(phone_number = %payload.phone_number, "invalid phone number");
        return Err(UserError::Validation("Invalid phone number".into()));
    }

    let federated = payload.facebook_account_id != 0 || payload.google_account_id != 0;
    if !federated && payload.password.is_empty() {
        return Err(UserError::Validation("Password is required".into()));
    }

    let user = state
        .users
        .create_user(NewUser {
            fullname: payload.fullname,
            phone_number: payload.phone_number,
            password: payload.password,
            address: payload.address,
            date_of_birth: payload.date_of_birth,
            facebook_account_id: payload.facebook_account_id,
            google_account_id: payload.google_account_id,
            role_id: payload.role_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, UserError> {
    payload.phone_number = payload.phone_number.trim().to_string();

    let token = state
        .users
        .login(&payload.phone_number, &payload.password, payload.role_id)
        .await?;

    Ok(Json(LoginResponse { token }))
}

#[instrument(skip(state, _admin))]
pub async fn block(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, UserError> {
    state.users.block_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
