//! Account storage keyed by normalized email.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("account already exists")]
    DuplicateAccount,
    #[error("unknown account")]
    UnknownAccount,
}

pub trait CredentialStore: Send + Sync {
    /// Create an account; the existence check and insert happen atomically.
    ///
    /// # Errors
    /// Returns [`CredentialError::DuplicateAccount`] if the email is taken.
    fn register(&self, email: &str, password_hash: String) -> Result<Account, CredentialError>;

    fn find(&self, email: &str) -> Option<Account>;

    /// # Errors
    /// Returns [`CredentialError::UnknownAccount`] if the email is not registered.
    fn update_password_hash(&self, email: &str, password_hash: String)
        -> Result<(), CredentialError>;
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn register(&self, email: &str, password_hash: String) -> Result<Account, CredentialError> {
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        if accounts.contains_key(email) {
            return Err(CredentialError::DuplicateAccount);
        }
        let account = Account {
            email: email.to_string(),
            password_hash,
        };
        accounts.insert(email.to_string(), account.clone());
        Ok(account)
    }

    fn find(&self, email: &str) -> Option<Account> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(email)
            .cloned()
    }

    fn update_password_hash(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<(), CredentialError> {
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        let account = accounts
            .get_mut(email)
            .ok_or(CredentialError::UnknownAccount)?;
        account.password_hash = password_hash;
        Ok(())
    }
}
