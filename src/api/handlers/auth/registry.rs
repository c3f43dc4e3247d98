//! In-process token registries.
//!
//! Each registry owns a single lock around its map. Session entries are
//! evicted only when a session TTL is configured; admin tokens live for the
//! lifetime of the process, reset tokens until they are consumed.

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use super::credentials::CredentialStore;
use super::utils::generate_hex_token;

const RESET_TOKEN_BYTES: usize = 32;
const ADMIN_TOKEN_BYTES: usize = 32;

/// Secondary index of issued session tokens.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Option<Duration>,
}

#[derive(Debug)]
struct SessionEntry {
    email: String,
    recorded_at: Instant,
}

impl SessionEntry {
    fn expired(&self, ttl: Option<Duration>, now: Instant) -> bool {
        ttl.is_some_and(|ttl| now.saturating_duration_since(self.recorded_at) > ttl)
    }
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries older than `ttl` stop resolving and are dropped on the next
    /// `record`. `None` keeps every entry.
    #[must_use]
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            sessions: RwLock::default(),
            ttl,
        }
    }

    pub fn record(&self, token: &str, email: &str) {
        self.record_at(token, email, Instant::now());
    }

    fn record_at(&self, token: &str, email: &str, recorded_at: Instant) {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if self.ttl.is_some() {
            sessions.retain(|_, entry| !entry.expired(self.ttl, now));
        }
        sessions.insert(
            token.to_string(),
            SessionEntry {
                email: email.to_string(),
                recorded_at,
            },
        );
    }

    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<String> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .filter(|entry| !entry.expired(self.ttl, Instant::now()))
            .map(|entry| entry.email.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One-time password reset tokens.
#[derive(Debug, Default)]
pub struct ResetTokenRegistry {
    tokens: RwLock<HashMap<String, String>>,
}

impl ResetTokenRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a reset token bound to `email`.
    ///
    /// # Errors
    /// Returns an error if randomness is unavailable.
    pub fn create(&self, email: &str) -> Result<String> {
        let token = generate_hex_token(RESET_TOKEN_BYTES)?;
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), email.to_string());
        Ok(token)
    }

    /// Consume a token, returning its email.
    ///
    /// Unknown, already consumed, and orphaned tokens (account gone) all
    /// return `None`. An orphaned token stays in the map.
    pub fn consume(&self, token: &str, accounts: &dyn CredentialStore) -> Option<String> {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        let email = tokens.get(token)?;
        accounts.find(email)?;
        tokens.remove(token)
    }
}

/// Opaque admin tokens; membership is the admin capability.
#[derive(Debug, Default)]
pub struct AdminTokenRegistry {
    tokens: RwLock<HashSet<String>>,
}

impl AdminTokenRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns an error if randomness is unavailable.
    pub fn issue(&self) -> Result<String> {
        let token = generate_hex_token(ADMIN_TOKEN_BYTES)?;
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone());
        Ok(token)
    }

    #[must_use]
    pub fn is_valid(&self, token: &str) -> bool {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(token)
    }
}
