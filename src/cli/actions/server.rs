use crate::api::{
    self,
    handlers::{
        auth::{AuthConfig, AuthState},
        feedback::{FeedbackStore, MemoryFeedbackStore},
    },
};
use anyhow::{Context, Result};
use rand::{rngs::OsRng, RngCore};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{info, warn};

const GENERATED_SECRET_BYTES: usize = 32;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub frontend_origin: Option<String>,
    pub token_secret: Option<SecretString>,
    pub admin_username: String,
    pub admin_password: Option<SecretString>,
    pub allowed_email_domains: String,
    pub session_ttl_seconds: u64,
    pub expose_reset_token: bool,
}

impl Args {
    /// Build the auth configuration, generating a signing secret when none was given.
    ///
    /// # Errors
    /// Returns an error if a random secret cannot be generated.
    pub fn auth_config(&self) -> Result<AuthConfig> {
        let token_secret = match &self.token_secret {
            Some(secret) => secret.clone(),
            None => {
                warn!("No token secret configured; generated a random one, sessions will not survive a restart");
                generate_secret()?
            }
        };
        if self.admin_password.is_none() {
            warn!("No admin password configured; admin login is disabled");
        }
        if self.expose_reset_token {
            warn!("Password reset tokens are returned in API responses");
        }

        Ok(AuthConfig::new(token_secret)
            .with_admin_credentials(self.admin_username.clone(), self.admin_password.clone())
            .with_allowed_email_domains(&self.allowed_email_domains)
            .with_session_ttl_seconds(self.session_ttl_seconds)
            .with_expose_reset_token(self.expose_reset_token))
    }
}

fn generate_secret() -> Result<SecretString> {
    let mut bytes = [0u8; GENERATED_SECRET_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("Failed to generate token secret")?;
    Ok(SecretString::from(hex::encode(bytes)))
}

/// Execute the server action.
/// # Errors
/// Returns an error if the auth state cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = args.auth_config()?;
    let auth_state = Arc::new(AuthState::new(auth_config).context("Failed to build auth state")?);
    let feedback_store: Arc<dyn FeedbackStore> = Arc::new(MemoryFeedbackStore::seeded());

    info!(
        allowed_email_domains = ?auth_state.config().allowed_email_domains(),
        session_ttl = ?auth_state.config().session_ttl(),
        "Starting course feedback service"
    );

    api::new(
        args.port,
        auth_state,
        feedback_store,
        args.frontend_origin.as_deref(),
    )
    .await
}
