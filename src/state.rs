use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::auth::authenticator::StoreAuthenticator;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::Argon2Hasher;
use crate::config::AppConfig;
use crate::users::service::UserService;
use crate::users::store::{PgRoleStore, PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: UserService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self::from_parts(db, config))
    }

    /// Wires the production collaborators once at startup; everything
    /// downstream holds `Arc<dyn …>` handles.
    pub fn from_parts(db: PgPool, config: Arc<AppConfig>) -> Self {
        let user_store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db.clone()));
        let role_store = Arc::new(PgRoleStore::new(db.clone()));
        let hasher = Arc::new(Argon2Hasher);
        let authenticator = Arc::new(StoreAuthenticator::new(user_store.clone(), hasher.clone()));
        let tokens = Arc::new(JwtKeys::from_config(&config.jwt));

        let users = UserService::new(user_store, role_store, hasher, authenticator, tokens);

        Self { db, config, users }
    }
}
