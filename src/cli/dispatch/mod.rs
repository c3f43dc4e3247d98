//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action the binary runs, currently only
//! starting the API server with its auth configuration.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, ARG_FRONTEND_ORIGIN, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if an argument is present but unusable.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(5000);
    let frontend_origin = matches.get_one::<String>(ARG_FRONTEND_ORIGIN).cloned();

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        frontend_origin,
        token_secret: auth_opts.token_secret,
        admin_username: auth_opts.admin_username,
        admin_password: auth_opts.admin_password,
        allowed_email_domains: auth_opts.allowed_email_domains,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
        expose_reset_token: auth_opts.expose_reset_token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_action_from_flags() {
        temp_env::with_vars(
            [
                ("COURSE_FEEDBACK_PORT", None::<&str>),
                ("COURSE_FEEDBACK_FRONTEND_ORIGIN", None),
                ("COURSE_FEEDBACK_TOKEN_SECRET", None),
                ("COURSE_FEEDBACK_ADMIN_PASSWORD", None),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec![
                    "course-feedback",
                    "--port",
                    "7000",
                    "--frontend-origin",
                    "http://localhost:5173",
                    "--admin-password",
                    "pw",
                ]);
                let result = handler(&matches);
                assert!(result.is_ok());
                if let Ok(Action::Server(args)) = result {
                    assert_eq!(args.port, 7000);
                    assert_eq!(
                        args.frontend_origin.as_deref(),
                        Some("http://localhost:5173")
                    );
                    assert!(args.token_secret.is_none());
                    assert!(args.admin_password.is_some());
                }
            },
        );
    }

    #[test]
    fn blank_admin_password_fails_dispatch() {
        temp_env::with_vars([("COURSE_FEEDBACK_ADMIN_PASSWORD", Some(" "))], || {
            let matches = crate::cli::commands::new().get_matches_from(vec!["course-feedback"]);
            assert!(handler(&matches).is_err());
        });
    }
}
