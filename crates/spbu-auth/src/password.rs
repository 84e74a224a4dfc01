//! Login password checks against stored Argon2id hashes.
//!
//! Hashes are written by the user store; this side only reads the PHC
//! string, so cost parameters travel with each hash.

use std::borrow::Cow;
use std::sync::OnceLock;

use argon2::password_hash::{self, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};

use crate::error::AuthError;

const DECOY_SALT: &str = "c3BidS1kZWNveS1zYWx0";

fn with_pepper<'a>(password: &'a str, pepper: Option<&str>) -> Cow<'a, str> {
    match pepper {
        Some(p) => Cow::Owned(format!("{p}{password}")),
        None => Cow::Borrowed(password),
    }
}

/// Check `candidate` against the stored `phc` hash.
///
/// Returns `Ok(false)` on mismatch and an error only when the stored hash
/// cannot be parsed.
pub fn verify(candidate: &str, phc: &str, pepper: Option<&str>) -> Result<bool, AuthError> {
    let stored = PasswordHash::new(phc)
        .map_err(|e| AuthError::Crypto(format!("stored hash is malformed: {e}")))?;
    let input = with_pepper(candidate, pepper);
    match Argon2::default().verify_password(input.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(e.to_string())),
    }
}

/// Spend one verification on a throwaway hash so that an unknown username
/// takes as long to refuse as a wrong password.
pub fn verify_decoy(candidate: &str, pepper: Option<&str>) {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    let decoy = DECOY.get_or_init(|| {
        let salt = SaltString::from_b64(DECOY_SALT).ok()?;
        Argon2::default()
            .hash_password(b"decoy", &salt)
            .ok()
            .map(|h| h.to_string())
    });
    if let Some(phc) = decoy {
        let _ = verify(candidate, phc, pepper);
    }
}

/// Reject passwords shorter than `min_len` characters.
pub fn check_policy(password: &str, min_len: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_len {
        return Err(AuthError::PasswordTooShort(min_len));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "shift-pagi-01";

    #[test]
    fn stored_hash_round_trip() {
        let phc = spbu_db::hash_password(PASSWORD, None).unwrap();
        assert!(verify(PASSWORD, &phc, None).unwrap());
        assert!(!verify("shift-malam-01", &phc, None).unwrap());
    }

    #[test]
    fn pepper_must_match() {
        let phc = spbu_db::hash_password(PASSWORD, Some("spbu-pepper")).unwrap();
        assert!(verify(PASSWORD, &phc, Some("spbu-pepper")).unwrap());
        assert!(!verify(PASSWORD, &phc, None).unwrap());
        assert!(!verify(PASSWORD, &phc, Some("other")).unwrap());
    }

    #[test]
    fn unparseable_hash_is_an_error() {
        assert!(matches!(
            verify(PASSWORD, "plaintext", None),
            Err(AuthError::Crypto(_))
        ));
    }

    #[test]
    fn policy_counts_characters() {
        assert!(check_policy("12345678", 8).is_ok());
        assert!(matches!(
            check_policy("1234567", 8),
            Err(AuthError::PasswordTooShort(8))
        ));
        // Multi-byte characters count once.
        assert!(check_policy("kataßandi", 9).is_ok());
    }
}
