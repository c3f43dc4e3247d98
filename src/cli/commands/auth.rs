use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;

use crate::api::handlers::auth::DEFAULT_ALLOWED_EMAIL_DOMAINS;

pub const ARG_TOKEN_SECRET: &str = "token-secret";
pub const ARG_ADMIN_USERNAME: &str = "admin-username";
pub const ARG_ADMIN_PASSWORD: &str = "admin-password";
pub const ARG_ALLOWED_EMAIL_DOMAINS: &str = "allowed-email-domains";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_EXPOSE_RESET_TOKEN: &str = "expose-reset-token";

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_token_args(command);
    with_admin_args(command)
}

fn with_token_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_TOKEN_SECRET)
                .long(ARG_TOKEN_SECRET)
                .help("HMAC secret used to sign session tokens")
                .long_help(
                    "HMAC secret used to sign session tokens. When unset a random secret is generated at startup and tokens do not survive a restart.",
                )
                .env("COURSE_FEEDBACK_TOKEN_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_ALLOWED_EMAIL_DOMAINS)
                .long(ARG_ALLOWED_EMAIL_DOMAINS)
                .help("Comma-separated email domains allowed to register")
                .env("COURSE_FEEDBACK_ALLOWED_EMAIL_DOMAINS")
                .default_value(DEFAULT_ALLOWED_EMAIL_DOMAINS),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Reject session tokens older than this many seconds (0 disables expiry)")
                .env("COURSE_FEEDBACK_SESSION_TTL_SECONDS")
                .default_value("0")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_EXPOSE_RESET_TOKEN)
                .long(ARG_EXPOSE_RESET_TOKEN)
                .help("Return password reset tokens in the forgot-password response")
                .env("COURSE_FEEDBACK_EXPOSE_RESET_TOKEN")
                .default_value("true")
                .value_parser(clap::value_parser!(bool))
                .action(ArgAction::Set),
        )
}

fn with_admin_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ADMIN_USERNAME)
                .long(ARG_ADMIN_USERNAME)
                .help("Admin panel username")
                .env("COURSE_FEEDBACK_ADMIN_USERNAME")
                .default_value("admin"),
        )
        .arg(
            Arg::new(ARG_ADMIN_PASSWORD)
                .long(ARG_ADMIN_PASSWORD)
                .help("Admin panel password; admin login is disabled when unset")
                .env("COURSE_FEEDBACK_ADMIN_PASSWORD")
                .hide_env_values(true),
        )
}

#[derive(Debug)]
pub struct Options {
    pub token_secret: Option<SecretString>,
    pub admin_username: String,
    pub admin_password: Option<SecretString>,
    pub allowed_email_domains: String,
    pub session_ttl_seconds: u64,
    pub expose_reset_token: bool,
}

impl Options {
    /// Parse auth options from CLI matches.
    ///
    /// # Errors
    /// Returns an error if a provided secret is blank.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let token_secret = secret_arg(matches, ARG_TOKEN_SECRET)?;
        let admin_password = secret_arg(matches, ARG_ADMIN_PASSWORD)?;

        Ok(Self {
            token_secret,
            admin_username: matches
                .get_one::<String>(ARG_ADMIN_USERNAME)
                .cloned()
                .unwrap_or_else(|| "admin".to_string()),
            admin_password,
            allowed_email_domains: matches
                .get_one::<String>(ARG_ALLOWED_EMAIL_DOMAINS)
                .cloned()
                .unwrap_or_else(|| DEFAULT_ALLOWED_EMAIL_DOMAINS.to_string()),
            session_ttl_seconds: matches
                .get_one::<u64>(ARG_SESSION_TTL_SECONDS)
                .copied()
                .unwrap_or(0),
            expose_reset_token: matches
                .get_one::<bool>(ARG_EXPOSE_RESET_TOKEN)
                .copied()
                .unwrap_or(true),
        })
    }
}

fn secret_arg(matches: &ArgMatches, id: &str) -> Result<Option<SecretString>> {
    match matches.get_one::<String>(id) {
        Some(value) if value.trim().is_empty() => {
            Err(anyhow::anyhow!("--{id} must not be empty when provided"))
        }
        Some(value) => Ok(Some(SecretString::from(value.clone()))),
        None => Ok(None),
    }
}
