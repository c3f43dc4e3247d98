//! Self-verifying session tokens.
//!
//! Flow Overview:
//! 1) Draw a 16-byte random nonce and stamp the current unix time in millis.
//! 2) Sign `email.millis.nonce` with HMAC-SHA256 keyed by the process secret.
//! 3) Append the hex signature as the fourth dot-separated field.
//!
//! Verification recomputes the signature; no server-side state is consulted.

use anyhow::{anyhow, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

use super::utils::{constant_time_str_eq, generate_hex_token};

type HmacSha256 = Hmac<Sha256>;

const NONCE_BYTES: usize = 16;
const SIGNATURE_HEX_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

/// Fields carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub email: String,
    pub issued_at_millis: u128,
    pub nonce: String,
}

#[derive(Clone)]
pub struct TokenCodec {
    mac: HmacSha256,
    ttl: Option<Duration>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("mac", &"***")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenCodec {
    /// Build a codec keyed by `secret`.
    ///
    /// # Errors
    /// Returns an error if the HMAC key cannot be initialized.
    pub fn new(secret: &[u8]) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|err| anyhow!("invalid token secret: {err}"))?;
        Ok(Self { mac, ttl: None })
    }

    /// Reject tokens older than `ttl`. `None` keeps tokens valid forever.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issue a fresh token for `email`.
    ///
    /// # Errors
    /// Returns an error if the nonce cannot be generated.
    pub fn issue(&self, email: &str) -> Result<String> {
        let nonce = generate_hex_token(NONCE_BYTES)?;
        let payload = format!("{email}.{}.{nonce}", now_millis());
        let signature = self.sign(&payload);
        Ok(format!("{payload}.{signature}"))
    }

    /// Return the embedded email for a valid token.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<String> {
        self.decode(token).ok().map(|claims| claims.email)
    }

    /// Parse and check a token, reporting why it was rejected.
    ///
    /// # Errors
    /// Returns [`TokenError`] for malformed, forged or expired tokens.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        // Emails contain dots, so peel the fixed fields off the right.
        let mut parts = token.rsplitn(4, '.');
        let (Some(signature), Some(nonce), Some(issued_at), Some(email)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        if email.is_empty() || nonce.is_empty() {
            return Err(TokenError::Malformed);
        }
        if !issued_at.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TokenError::Malformed);
        }
        let issued_at_millis: u128 = issued_at.parse().map_err(|_| TokenError::Malformed)?;
        if signature.len() != SIGNATURE_HEX_LEN
            || !signature.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(TokenError::Malformed);
        }

        let expected = self.sign(&format!("{email}.{issued_at}.{nonce}"));
        if !constant_time_str_eq(&expected, signature) {
            return Err(TokenError::InvalidSignature);
        }

        if let Some(ttl) = self.ttl {
            if issued_at_millis.saturating_add(ttl.as_millis()) < now_millis() {
                return Err(TokenError::Expired);
            }
        }

        Ok(TokenClaims {
            email: email.to_string(),
            issued_at_millis,
            nonce: nonce.to_string(),
        })
    }

    /// Sign an arbitrary payload; lets tests craft tokens with chosen timestamps.
    #[cfg(test)]
    pub(crate) fn sign_payload(&self, payload: &str) -> String {
        format!("{payload}.{}", self.sign(payload))
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> Result<TokenCodec> {
        TokenCodec::new(b"test-secret")
    }

    #[test]
    fn issued_token_verifies() -> Result<()> {
        let codec = codec()?;
        let token = codec.issue("a@gmail.com")?;
        assert_eq!(codec.verify(&token).as_deref(), Some("a@gmail.com"));
        Ok(())
    }

    #[test]
    fn token_has_four_fields_after_email() -> Result<()> {
        let codec = codec()?;
        let token = codec.issue("a@gmail.com")?;
        let rest = token
            .strip_prefix("a@gmail.com.")
            .ok_or_else(|| anyhow!("token does not start with email"))?;
        let fields: Vec<&str> = rest.split('.').collect();
        assert_eq!(fields.len(), 3);
        assert!(fields[0].parse::<u128>().is_ok());
        assert_eq!(fields[1].len(), NONCE_BYTES * 2);
        assert_eq!(fields[2].len(), SIGNATURE_HEX_LEN);
        Ok(())
    }

    #[test]
    fn tokens_are_distinct() -> Result<()> {
        let codec = codec()?;
        assert_ne!(codec.issue("a@gmail.com")?, codec.issue("a@gmail.com")?);
        Ok(())
    }

    #[test]
    fn any_signature_mutation_is_rejected() -> Result<()> {
        let codec = codec()?;
        let token = codec.issue("a@gmail.com")?;
        let sig_start = token.len() - SIGNATURE_HEX_LEN;

        for index in sig_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'0' { b'1' } else { b'0' };
            let mutated = String::from_utf8(bytes)?;
            assert_eq!(codec.verify(&mutated), None, "mutation at {index} accepted");
        }
        Ok(())
    }

    #[test]
    fn tampered_email_is_rejected() -> Result<()> {
        let codec = codec()?;
        let token = codec.issue("a@gmail.com")?;
        let forged = token.replacen("a@gmail.com", "b@gmail.com", 1);
        assert_eq!(codec.decode(&forged), Err(TokenError::InvalidSignature));
        Ok(())
    }

    #[test]
    fn other_secret_is_rejected() -> Result<()> {
        let token = codec()?.issue("a@gmail.com")?;
        let other = TokenCodec::new(b"another-secret")?;
        assert_eq!(other.verify(&token), None);
        Ok(())
    }

    #[test]
    fn malformed_tokens_are_rejected_without_panicking() -> Result<()> {
        let codec = codec()?;
        let token = codec.issue("a@gmail.com")?;
        let truncated = &token[..token.len() - 1];
        let cases = [
            "",
            "...",
            "a.b.c",
            "no-dots-at-all",
            ".1700000000000.abcd.ffff",
            "a@gmail.com.notanumber.abcd.ffff",
            "a@gmail.com.-5.abcd.ffff",
            truncated,
        ];
        for case in cases {
            assert_eq!(codec.decode(case), Err(TokenError::Malformed), "{case}");
        }
        Ok(())
    }

    #[test]
    fn ttl_rejects_old_tokens() -> Result<()> {
        let codec = codec()?;
        let token = codec.sign_payload("a@gmail.com.1000.00112233445566778899aabbccddeeff");

        assert_eq!(codec.verify(&token).as_deref(), Some("a@gmail.com"));

        let expiring = codec.with_ttl(Some(Duration::from_secs(60)));
        assert_eq!(expiring.decode(&token), Err(TokenError::Expired));
        let fresh = expiring.issue("a@gmail.com")?;
        assert_eq!(expiring.verify(&fresh).as_deref(), Some("a@gmail.com"));
        Ok(())
    }
}
