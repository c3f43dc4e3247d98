//! # course-feedback
//!
//! A course feedback service. Students browse a fixed course catalog and leave
//! ratings, administrators moderate feedback from a separate panel.
//!
//! ## Authentication
//!
//! Users register and log in with email/password. Passwords are stored as a
//! digest produced by a swappable [`PasswordHasher`](api::handlers::auth::PasswordHasher).
//! A successful register/login returns a self-verifying bearer token:
//!
//! ```text
//! <email>.<unixMillis>.<nonceHex>.<hmacSha256Hex>
//! ```
//!
//! The HMAC covers the first three fields joined by dots. Tokens are also
//! recorded in a session registry, which acts as a fallback lookup for tokens
//! the codec cannot verify.
//!
//! ## Trust Domains
//!
//! Admin tokens are opaque random strings. Membership in the admin registry is
//! the only authorization fact; they carry no user identity, and user tokens
//! never grant admin access.
//!
//! ## Password Reset
//!
//! Reset tokens are single-use. `forgot-password` always answers with the same
//! shape so account existence is not revealed.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
