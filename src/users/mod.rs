use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod models;
pub mod service;
pub mod store;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
