//! Auth state and configuration.

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;

use super::credentials::{CredentialStore, MemoryCredentialStore};
use super::hashing::{PasswordHasher, Sha256PasswordHasher};
use super::registry::{AdminTokenRegistry, ResetTokenRegistry, SessionRegistry};
use super::token::TokenCodec;

pub const DEFAULT_ALLOWED_EMAIL_DOMAINS: &str = "gmail.com,mail.ru";
const DEFAULT_ADMIN_USERNAME: &str = "admin";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    token_secret: SecretString,
    admin_username: String,
    admin_password: Option<SecretString>,
    allowed_email_domains: Vec<String>,
    session_ttl_seconds: u64,
    expose_reset_token: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new(token_secret: SecretString) -> Self {
        Self {
            token_secret,
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: None,
            allowed_email_domains: parse_domains(DEFAULT_ALLOWED_EMAIL_DOMAINS),
            session_ttl_seconds: 0,
            expose_reset_token: true,
        }
    }

    #[must_use]
    pub fn with_admin_credentials(mut self, username: String, password: Option<SecretString>) -> Self {
        self.admin_username = username;
        self.admin_password = password;
        self
    }

    /// Comma-separated list; entries are trimmed and lowercased.
    #[must_use]
    pub fn with_allowed_email_domains(mut self, domains: &str) -> Self {
        self.allowed_email_domains = parse_domains(domains);
        self
    }

    /// Zero disables expiry.
    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_expose_reset_token(mut self, expose: bool) -> Self {
        self.expose_reset_token = expose;
        self
    }

    #[must_use]
    pub fn admin_username(&self) -> &str {
        &self.admin_username
    }

    pub(crate) fn admin_password(&self) -> Option<&str> {
        self.admin_password
            .as_ref()
            .map(|password| password.expose_secret())
    }

    #[must_use]
    pub fn allowed_email_domains(&self) -> &[String] {
        &self.allowed_email_domains
    }

    #[must_use]
    pub fn session_ttl(&self) -> Option<Duration> {
        (self.session_ttl_seconds > 0).then(|| Duration::from_secs(self.session_ttl_seconds))
    }

    #[must_use]
    pub fn expose_reset_token(&self) -> bool {
        self.expose_reset_token
    }
}

fn parse_domains(domains: &str) -> Vec<String> {
    domains
        .split(',')
        .map(|domain| domain.trim().to_lowercase())
        .filter(|domain| !domain.is_empty())
        .collect()
}

/// Everything the auth handlers and gateway share, injected as an `Extension`.
pub struct AuthState {
    config: AuthConfig,
    codec: TokenCodec,
    hasher: Arc<dyn PasswordHasher>,
    accounts: Arc<dyn CredentialStore>,
    sessions: SessionRegistry,
    reset_tokens: ResetTokenRegistry,
    admin_tokens: AdminTokenRegistry,
}

impl AuthState {
    /// Build state with in-memory stores and SHA-256 password digests.
    ///
    /// # Errors
    /// Returns an error if the token codec cannot be keyed.
    pub fn new(config: AuthConfig) -> Result<Self> {
        Self::with_backends(
            config,
            Arc::new(Sha256PasswordHasher),
            Arc::new(MemoryCredentialStore::new()),
        )
    }

    /// # Errors
    /// Returns an error if the token codec cannot be keyed.
    pub fn with_backends(
        config: AuthConfig,
        hasher: Arc<dyn PasswordHasher>,
        accounts: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let codec = TokenCodec::new(config.token_secret.expose_secret().as_bytes())?
            .with_ttl(config.session_ttl());
        let sessions = SessionRegistry::with_ttl(config.session_ttl());
        Ok(Self {
            config,
            codec,
            hasher,
            accounts,
            sessions,
            reset_tokens: ResetTokenRegistry::new(),
            admin_tokens: AdminTokenRegistry::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn hasher(&self) -> &dyn PasswordHasher {
        self.hasher.as_ref()
    }

    pub fn accounts(&self) -> &dyn CredentialStore {
        self.accounts.as_ref()
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    #[must_use]
    pub fn reset_tokens(&self) -> &ResetTokenRegistry {
        &self.reset_tokens
    }

    #[must_use]
    pub fn admin_tokens(&self) -> &AdminTokenRegistry {
        &self.admin_tokens
    }

    /// Issue a session token for `email` and record it before returning.
    ///
    /// # Errors
    /// Returns an error if the nonce cannot be generated.
    pub fn start_session(&self, email: &str) -> Result<String> {
        let token = self.codec.issue(email)?;
        self.sessions.record(&token, email);
        Ok(token)
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("config", &self.config)
            .field("codec", &self.codec)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("test-secret".to_string())
    }

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new(secret());
        assert_eq!(config.admin_username(), "admin");
        assert_eq!(config.admin_password(), None);
        assert_eq!(config.allowed_email_domains(), ["gmail.com", "mail.ru"]);
        assert_eq!(config.session_ttl(), None);
        assert!(config.expose_reset_token());

        let config = config
            .with_admin_credentials("root".to_string(), Some(SecretString::from("pw".to_string())))
            .with_allowed_email_domains(" Example.org , ,test.dev")
            .with_session_ttl_seconds(90)
            .with_expose_reset_token(false);

        assert_eq!(config.admin_username(), "root");
        assert_eq!(config.admin_password(), Some("pw"));
        assert_eq!(config.allowed_email_domains(), ["example.org", "test.dev"]);
        assert_eq!(config.session_ttl(), Some(Duration::from_secs(90)));
        assert!(!config.expose_reset_token());
    }

    #[test]
    fn start_session_records_token() -> Result<()> {
        let state = AuthState::new(AuthConfig::new(secret()))?;
        let token = state.start_session("a@gmail.com")?;
        assert_eq!(state.codec().verify(&token).as_deref(), Some("a@gmail.com"));
        assert_eq!(
            state.sessions().resolve(&token).as_deref(),
            Some("a@gmail.com")
        );
        Ok(())
    }

    #[test]
    fn debug_does_not_leak_secrets() -> Result<()> {
        let config = AuthConfig::new(secret())
            .with_admin_credentials("admin".to_string(), Some(SecretString::from("hunter2".to_string())));
        let state = AuthState::new(config)?;
        let rendered = format!("{state:?}");
        assert!(!rendered.contains("test-secret"));
        assert!(!rendered.contains("hunter2"));
        Ok(())
    }
}
