use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Role, User};

/// Persistence boundary for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_phone_number(&self, phone_number: &str) -> anyhow::Result<Option<User>>;
    async fn exists_by_phone_number(&self, phone_number: &str) -> anyhow::Result<bool>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn insert(&self, user: &User) -> anyhow::Result<User>;
    async fn set_active(&self, id: Uuid, active: bool) -> anyhow::Result<()>;
}

/// Persistence boundary for roles. Read-only; the table is seeded by
/// migration.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Role>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_phone_number(&self, phone_number: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, fullname, phone_number, password_hash, address, date_of_birth,
                   facebook_account_id, google_account_id, is_active, role_id, created_at
            FROM users
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn exists_by_phone_number(&self, phone_number: &str) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE phone_number = $1)",
        )
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, fullname, phone_number, password_hash, address, date_of_birth,
                   facebook_account_id, google_account_id, is_active, role_id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: &User) -> anyhow::Result<User> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, fullname, phone_number, password_hash, address,
                               date_of_birth, facebook_account_id, google_account_id,
                               is_active, role_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, fullname, phone_number, password_hash, address, date_of_birth,
                      facebook_account_id, google_account_id, is_active, role_id, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.fullname)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(&user.address)
        .bind(user.date_of_birth)
        .bind(user.facebook_account_id)
        .bind(user.google_account_id)
        .bind(user.is_active)
        .bind(user.role_id)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }
}
