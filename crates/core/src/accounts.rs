//! User accounts used for credential issuance.
//!
//! The movie service never looks at accounts; it only receives an
//! [`OwnerId`](crate::types::OwnerId). Accounts exist so the transport can
//! turn an email/password pair into a token.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// A stored account. Contains the password hash -- never serialize it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// Input for [`UserDirectory::create`]. The hash is computed by the caller.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Case-insensitive lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, CoreError>;

    /// Create an account. Fails with `Conflict` if the email is taken.
    async fn create(&self, input: &NewUserAccount) -> Result<UserAccount, CoreError>;
}

/// Canonical form used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic shape check: something before and after a single `@`.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(CoreError::invalid_field("email", "must be a valid email address")),
    }
}

#[derive(Debug)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserAccount>>,
    next_id: AtomicI64,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, CoreError> {
        Ok(self.users.read().await.get(&normalize_email(email)).cloned())
    }

    async fn create(&self, input: &NewUserAccount) -> Result<UserAccount, CoreError> {
        let email = normalize_email(&input.email);
        let mut users = self.users.write().await;
        if users.contains_key(&email) {
            return Err(CoreError::Conflict(format!(
                "An account with email {email} already exists"
            )));
        }
        let account = UserAccount {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            email: email.clone(),
            password_hash: input.password_hash.clone(),
            created_at: Utc::now(),
        };
        users.insert(email, account.clone());
        Ok(account)
    }
}
