use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::authenticator::{AuthError, Authenticator};
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::PasswordHasher;
use crate::error::UserError;

use super::models::{NewUser, User};
use super::store::{RoleStore, UserStore};

/// Orchestrates registration, login and account blocking over the injected
/// collaborators.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    hasher: Arc<dyn PasswordHasher>,
    authenticator: Arc<dyn Authenticator>,
    tokens: Arc<dyn TokenIssuer>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        hasher: Arc<dyn PasswordHasher>,
        authenticator: Arc<dyn Authenticator>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            roles,
            hasher,
            authenticator,
            tokens,
        }
    }

    /// Registers a new account. Self-registration can never produce an
    /// administrator.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, UserError> {
        if self
            .users
            .exists_by_phone_number(&new_user.phone_number)
            .await?
        {
            return Err(UserError::PhoneNumberTaken);
        }

        let role = self
            .roles
            .find_by_id(new_user.role_id)
            .await?
            .ok_or(UserError::RoleNotFound)?;
        if role.is_admin() {
            warn!(
                phone_number = %new_user.phone_number,
                "rejected self-registration of an admin account"
            );
            return Err(UserError::AdminRegistration);
        }

        let federated = new_user.facebook_account_id != 0 || new_user.google_account_id != 0;
        let password_hash = if federated {
            None
        } else {
            Some(self.hasher.hash(&new_user.password)?)
        };

        let user = User {
            id: Uuid::new_v4(),
            fullname: new_user.fullname,
            phone_number: new_user.phone_number,
            password_hash,
            address: new_user.address,
            date_of_birth: new_user.date_of_birth,
            facebook_account_id: new_user.facebook_account_id,
            google_account_id: new_user.google_account_id,
            is_active: true,
            role_id: role.id,
            created_at: OffsetDateTime::now_utc(),
        };

        let user = self.users.insert(&user).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Verifies credentials and the claimed role, then returns a signed
    /// session token. Checks run in order; the first failure wins.
    pub async fn login(
        &self,
        phone_number: &str,
        password: &str,
        role_id: i64,
    ) -> Result<String, UserError> {
        let user = self
            .users
            .find_by_phone_number(phone_number)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if user.has_local_password() {
            let Some(hash) = user.password_hash.as_deref() else {
                return Err(UserError::InvalidCredentials);
            };
            if !self.hasher.verify(password, hash)? {
                warn!(phone_number, "login with wrong password");
                return Err(UserError::InvalidCredentials);
            }
        }

        // The claimed role must exist and be the user's assigned role; it is
        // never corrected to the real one.
        let role = match self.roles.find_by_id(role_id).await? {
            Some(role) if role.id == user.role_id => role,
            _ => return Err(UserError::RoleMismatch),
        };

        if !user.is_active {
            return Err(UserError::AccountLocked);
        }

        // Federated users skip the hash comparison above, yet the raw
        // password still goes to the authenticator unchanged.
        self.authenticator
            .authenticate(phone_number, password, &role.name)
            .await
            .map_err(|e| match e {
                AuthError::BadCredentials => UserError::InvalidCredentials,
                AuthError::Internal(e) => UserError::Internal(e),
            })?;

        let token = self.tokens.issue(&user, &role)?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Deactivates an account. There is deliberately no unblock counterpart.
    pub async fn block_user(&self, user_id: Uuid) -> Result<(), UserError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::UserNotFound)?;

        self.users.set_active(user.id, false).await?;
        info!(user_id = %user.id, "user blocked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::macros::date;

    use super::*;
    use crate::auth::authenticator::StoreAuthenticator;
    use crate::auth::jwt::JwtKeys;
    use crate::auth::password::Argon2Hasher;
    use crate::config::JwtConfig;
    use crate::users::models::Role;

    #[derive(Default)]
    struct MemUserStore {
        users: Mutex<HashMap<Uuid, User>>,
    }

    #[async_trait]
    impl UserStore for MemUserStore {
        async fn find_by_phone_number(&self, phone_number: &str) -> anyhow::Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.phone_number == phone_number)
                .cloned())
        }

        async fn exists_by_phone_number(&self, phone_number: &str) -> anyhow::Result<bool> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .any(|u| u.phone_number == phone_number))
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
            Ok(self.users.lock().unwrap().get(&id).cloned())
        }

        async fn insert(&self, user: &User) -> anyhow::Result<User> {
            self.users.lock().unwrap().insert(user.id, user.clone());
            Ok(user.clone())
        }

        async fn set_active(&self, id: Uuid, active: bool) -> anyhow::Result<()> {
            if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
                user.is_active = active;
            }
            Ok(())
        }
    }

    struct MemRoleStore {
        roles: Vec<Role>,
    }

    #[async_trait]
    impl RoleStore for MemRoleStore {
        async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Role>> {
            Ok(self.roles.iter().find(|r| r.id == id).cloned())
        }
    }

    const USER_ROLE: i64 = 1;
    const ADMIN_ROLE: i64 = 2;

    fn test_keys() -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        })
    }

    fn test_service() -> (UserService, Arc<MemUserStore>, JwtKeys) {
        let users = Arc::new(MemUserStore::default());
        let roles = Arc::new(MemRoleStore {
            roles: vec![
                Role {
                    id: USER_ROLE,
                    name: "USER".into(),
                },
                Role {
                    id: ADMIN_ROLE,
                    name: "ADMIN".into(),
                },
            ],
        });
        let hasher = Arc::new(Argon2Hasher);
        let authenticator = Arc::new(StoreAuthenticator::new(users.clone(), hasher.clone()));
        let keys = test_keys();

        let service = UserService::new(
            users.clone(),
            roles,
            hasher,
            authenticator,
            Arc::new(keys.clone()),
        );
        (service, users, keys)
    }

    fn registration(phone_number: &str, password: &str, role_id: i64) -> NewUser {
        NewUser {
            fullname: "Jane Buyer".into(),
            phone_number: phone_number.into(),
            password: password.into(),
            address: "12 Market St".into(),
            date_of_birth: date!(1990 - 04 - 02),
            facebook_account_id: 0,
            google_account_id: 0,
            role_id,
        }
    }

    #[tokio::test]
    async fn register_rejects_duplicate_phone_number() {
        let (service, _, _) = test_service();
        service
            .create_user(registration("0900000001", "pw", USER_ROLE))
            .await
            .expect("first registration");

        let err = service
            .create_user(registration("0900000001", "other", USER_ROLE))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::PhoneNumberTaken));
    }

    #[tokio::test]
    async fn register_rejects_unknown_role() {
        let (service, _, _) = test_service();
        let err = service
            .create_user(registration("0900000002", "pw", 999))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::RoleNotFound));
    }

    #[tokio::test]
    async fn register_rejects_admin_role() {
        let (service, users, _) = test_service();
        let err = service
            .create_user(registration("0900000003", "pw", ADMIN_ROLE))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::AdminRegistration));
        assert!(users.users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn local_registration_stores_a_hash_not_the_password() {
        let (service, _, _) = test_service();
        let user = service
            .create_user(registration("0900000004", "pw", USER_ROLE))
            .await
            .expect("register");

        let hash = user.password_hash.expect("local user has a hash");
        assert_ne!(hash, "pw");
        assert!(crate::auth::password::verify_password("pw", &hash).unwrap());
    }

    #[tokio::test]
    async fn federated_registration_stores_no_password_hash() {
        let (service, _, _) = test_service();
        let mut new_user = registration("0900000005", "still-a-password", USER_ROLE);
        new_user.google_account_id = 42;

        let user = service.create_user(new_user).await.expect("register");
        assert!(user.password_hash.is_none());
    }

    #[tokio::test]
    async fn login_with_unknown_phone_number_fails() {
        let (service, _, _) = test_service();
        let err = service
            .login("0999999999", "pw", USER_ROLE)
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_never_corrects_a_mismatched_role() {
        let (service, _, _) = test_service();
        service
            .create_user(registration("0900000006", "pw", USER_ROLE))
            .await
            .expect("register");

        // Existing role that is not the user's.
        let err = service
            .login("0900000006", "pw", ADMIN_ROLE)
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::RoleMismatch));

        // Role id that resolves to nothing.
        let err = service.login("0900000006", "pw", 999).await.unwrap_err();
        assert!(matches!(err, UserError::RoleMismatch));
    }

    #[tokio::test]
    async fn role_check_runs_even_for_federated_users() {
        let (service, _, _) = test_service();
        let mut new_user = registration("0900000007", "", USER_ROLE);
        new_user.facebook_account_id = 7;
        service.create_user(new_user).await.expect("register");

        let err = service
            .login("0900000007", "anything", ADMIN_ROLE)
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::RoleMismatch));
    }

    #[tokio::test]
    async fn federated_login_skips_password_check() {
        let (service, _, keys) = test_service();
        let mut new_user = registration("0900000008", "", USER_ROLE);
        new_user.google_account_id = 8;
        let user = service.create_user(new_user).await.expect("register");

        // No local hash, so any password passes through to the authenticator.
        let token = service
            .login("0900000008", "whatever", USER_ROLE)
            .await
            .expect("federated login");
        assert_eq!(keys.verify(&token).expect("claims").sub, user.id);
    }

    #[tokio::test]
    async fn block_unknown_user_is_not_found_and_writes_nothing() {
        let (service, users, _) = test_service();
        let err = service.block_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, UserError::UserNotFound));
        assert!(users.users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn register_login_block_scenario() {
        let (service, _, keys) = test_service();

        let user = service
            .create_user(registration("0900000001", "pw", USER_ROLE))
            .await
            .expect("register");
        assert!(user.password_hash.is_some());

        let token = service
            .login("0900000001", "pw", USER_ROLE)
            .await
            .expect("login");
        let claims = keys.verify(&token).expect("token decodes");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.phone_number, "0900000001");
        assert_eq!(claims.role, "USER");

        let err = service
            .login("0900000001", "wrong", USER_ROLE)
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));

        service.block_user(user.id).await.expect("block");

        let err = service
            .login("0900000001", "pw", USER_ROLE)
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::AccountLocked));
    }
}
