//! Credential checks and default-account seeding on top of the
//! [`UserDirectory`] port.

use reelshelf_core::accounts::{
    normalize_email, validate_email, NewUserAccount, UserAccount, UserDirectory,
};
use reelshelf_core::error::CoreError;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Check an email/password pair. Unknown email and wrong password produce
/// the same `Unauthorized` error.
pub async fn authenticate(
    users: &dyn UserDirectory,
    email: &str,
    password: &str,
) -> AppResult<UserAccount> {
    let user = users
        .find_by_email(email)
        .await?
        .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    Ok(user)
}

/// Create the account if it does not exist yet. Idempotent: an existing
/// account is returned unchanged, password included.
pub async fn ensure_default_user(
    users: &dyn UserDirectory,
    email: &str,
    password: &str,
) -> AppResult<UserAccount> {
    validate_email(email)?;

    if let Some(existing) = users.find_by_email(email).await? {
        tracing::debug!(user_id = existing.id, "Default user already exists");
        return Ok(existing);
    }

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let input = NewUserAccount {
        email: normalize_email(email),
        password_hash,
    };

    match users.create(&input).await {
        Ok(account) => {
            tracing::info!(user_id = account.id, email = %account.email, "Default user created");
            Ok(account)
        }
        // Another process seeded it between the lookup and the insert.
        Err(CoreError::Conflict(_)) => users.find_by_email(email).await?.ok_or_else(|| {
            AppError::InternalError("Default user vanished after conflict".into())
        }),
        Err(e) => Err(e.into()),
    }
}
