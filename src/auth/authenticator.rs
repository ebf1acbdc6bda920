use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::auth::password::PasswordHasher;
use crate::users::store::UserStore;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("bad credentials")]
    BadCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Final credential check before a token is issued.
///
/// Receives the raw password even for federated principals; whether it is
/// compared against anything is up to the implementation.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(
        &self,
        phone_number: &str,
        password: &str,
        authority: &str,
    ) -> Result<(), AuthError>;
}

/// Authenticates against the same user records the service reads.
pub struct StoreAuthenticator {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl StoreAuthenticator {
    pub fn new(users: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl Authenticator for StoreAuthenticator {
    async fn authenticate(
        &self,
        phone_number: &str,
        password: &str,
        _authority: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_phone_number(phone_number)
            .await?
            .ok_or(AuthError::BadCredentials)?;

        match user.password_hash.as_deref() {
            Some(hash) => {
                if self.hasher.verify(password, hash)? {
                    Ok(())
                } else {
                    warn!(phone_number, "authentication rejected");
                    Err(AuthError::BadCredentials)
                }
            }
            // Federated accounts carry no local hash; the identity provider
            // already vouched for them.
            None => Ok(()),
        }
    }
}
