//! User-facing message texts.
//!
//! Clients resolve these through their own localization bundles keyed by the
//! constant names; the English strings here are the fallback copies.

pub const PHONE_NUMBER_EXISTS: &str = "Phone number already exists";
pub const ROLE_NOT_FOUND: &str = "Role not found";
pub const REGISTER_ADMIN_FORBIDDEN: &str = "You cannot register an administrator account";
pub const WRONG_PHONE_PASSWORD: &str = "Wrong phone number or password";
pub const ROLE_DOES_NOT_EXIST: &str = "Role does not exist";
pub const USER_IS_LOCKED: &str = "User is locked";
pub const USER_NOT_FOUND: &str = "User not found";
