//! Password hashing.
//!
//! Passwords are stored as `sha256$<salt hex>$<digest hex>`, where the digest
//! is SHA-256 over the salt followed by the password bytes.

use rand::Rng;
use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Derives a credential hash from a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill(&mut salt);
    encode(&salt, password)
}

/// Checks a candidate password against a stored credential hash.
///
/// Malformed hashes never verify.
pub fn verify_password(password: &str, credential_hash: &str) -> bool {
    let mut parts = credential_hash.splitn(3, '$');
    let (Some(SCHEME), Some(salt), Some(_)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    match hex::decode(salt) {
        Ok(salt) => encode(&salt, password) == credential_hash,
        Err(_) => false,
    }
}

fn encode(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    format!(
        "{SCHEME}${}${}",
        hex::encode(salt),
        hex::encode(hasher.finalize())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_never_contains_the_password() {
        let hash = hash_password("hunter2");
        assert!(hash.starts_with("sha256$"));
        assert!(!hash.contains("hunter2"));
    }

    #[test]
    fn same_password_gets_different_salts() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter2"));
    }

    #[test]
    fn verifies_only_the_original_password() {
        let hash = hash_password("hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn malformed_hashes_do_not_verify() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "md5$00$00"));
        assert!(!verify_password("x", "sha256$zz$00"));
    }
}
