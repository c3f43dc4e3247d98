//! Small helpers for auth validation and opaque token generation.

use anyhow::{Context, Result};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use rand::{rngs::OsRng, RngCore};
use regex::Regex;
use subtle::ConstantTimeEq;

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
///
/// Only printable ASCII is accepted: the email travels inside session tokens,
/// and header values cannot carry other bytes.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[!-~&&[^@]]+@[!-~&&[^@]]+\.[!-~&&[^@]]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// True when the domain part of a normalized email is on the allow-list.
pub(crate) fn email_domain_allowed(email_normalized: &str, allowed: &[String]) -> bool {
    let mut parts = email_normalized.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() => {
            allowed.iter().any(|candidate| candidate == domain)
        }
        _ => false,
    }
}

/// Random hex string built from `bytes` bytes of OS randomness.
pub(crate) fn generate_hex_token(bytes: usize) -> Result<String> {
    let mut buf = vec![0u8; bytes];
    OsRng
        .try_fill_bytes(&mut buf)
        .context("failed to generate random token")?;
    Ok(hex::encode(buf))
}

pub(crate) fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Extract the token from `Authorization: Bearer <token>`.
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.trim().strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Treat absent and whitespace-only JSON fields the same way.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn domains() -> Vec<String> {
        vec!["gmail.com".to_string(), "mail.ru".to_string()]
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@GMail.COM "), "alice@gmail.com");
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(valid_email("a@gmail.com"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn valid_email_requires_printable_ascii() {
        assert!(valid_email("first.last+tag@mail.ru"));
        assert!(!valid_email("иван@mail.ru"));
        assert!(!valid_email("user@почта.рф"));
        assert!(!valid_email("a b@gmail.com"));
    }

    #[test]
    fn email_domain_allowed_matches_exact_domain() {
        assert!(email_domain_allowed("a@gmail.com", &domains()));
        assert!(email_domain_allowed("ivan@mail.ru", &domains()));
        assert!(!email_domain_allowed("user@example.com", &domains()));
        assert!(!email_domain_allowed("user@sub.gmail.com", &domains()));
        assert!(!email_domain_allowed("a@b@gmail.com", &domains()));
        assert!(!email_domain_allowed("@gmail.com", &domains()));
    }

    #[test]
    fn generate_hex_token_has_expected_length() -> Result<()> {
        let first = generate_hex_token(16)?;
        let second = generate_hex_token(16)?;
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn constant_time_str_eq_compares_content() {
        assert!(constant_time_str_eq("secret", "secret"));
        assert!(!constant_time_str_eq("secret", "secreT"));
        assert!(!constant_time_str_eq("short", "longer"));
    }

    #[test]
    fn extract_bearer_token_requires_prefix() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer_token(&headers), Some("abc.def".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn non_empty_filters_blank() {
        assert_eq!(non_empty(Some("x")), Some("x"));
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(None), None);
    }
}
