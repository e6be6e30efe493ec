//! Salted password digests.
//!
//! Stored form is `{salt}${hex-sha256(salt || password)}`. The salt is a
//! fresh UUID per account, so identical passwords never share a digest.

use uuid::Uuid;
use voiceset_common::checksum::sha256_hex;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = salted_digest(&salt, password);
    format!("{salt}${digest}")
}

/// Verify a password against a stored `salt$digest` value.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => {
            let actual = salted_digest(salt, password);
            // compare without short-circuiting on the first differing byte
            actual.len() == expected.len()
                && actual
                    .bytes()
                    .zip(expected.bytes())
                    .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                    == 0
        }
        None => false,
    }
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut input = Vec::with_capacity(salt.len() + password.len());
    input.extend_from_slice(salt.as_bytes());
    input.extend_from_slice(password.as_bytes());
    sha256_hex(&input)
}
