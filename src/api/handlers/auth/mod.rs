//! Auth handlers and supporting modules.
//!
//! This module owns account registration, password login, password reset and
//! admin login, plus the request gateway that turns bearer tokens into
//! identities.
//!
//! ## Tokens
//!
//! Session tokens are `email.unixMillis.nonceHex.hmacHex`, signed with
//! HMAC-SHA256 under the process secret. They verify without server state;
//! every issued token is also recorded in a session registry that the gateway
//! consults when signature verification fails.
//!
//! Reset tokens (single use) and admin tokens are opaque random hex kept in
//! their own registries. An admin token is never a user identity.
//!
//! > **Note:** Every store is in-process. Restarting the service drops all
//! > accounts and tokens; with a random secret, signed tokens stop verifying.

pub(crate) mod admin;
mod credentials;
mod error;
mod hashing;
pub(crate) mod login;
pub(crate) mod password;
pub(crate) mod principal;
pub(crate) mod register;
mod registry;
mod state;
mod token;
pub(crate) mod types;
mod utils;

pub use credentials::{Account, CredentialError, CredentialStore, MemoryCredentialStore};
pub use error::AuthError;
pub use hashing::{PasswordHasher, Sha256PasswordHasher};
pub use principal::{authenticate, resolve_identity, AdminPrincipal, Identity, Principal};
pub use registry::{AdminTokenRegistry, ResetTokenRegistry, SessionRegistry};
pub use state::{AuthConfig, AuthState, DEFAULT_ALLOWED_EMAIL_DOMAINS};
pub use token::{TokenClaims, TokenCodec, TokenError};
