//! Salted SHA-256 password records.
//!
//! A stored record is the 20 character salt followed by
//! `base64(sha256(password || salt))`.

use base64ct::{Base64, Encoding};
use sha2::{Digest, Sha256};

pub const SALT_LEN: usize = 20;

fn digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    Base64::encode_string(&hasher.finalize())
}

/// Build the stored record for `password` under `salt`.
#[must_use]
pub fn salted_hash(password: &str, salt: &str) -> String {
    format!("{salt}{}", digest(password, salt))
}

/// Check `password` against a stored salted hash.
#[must_use]
pub fn verify(password: &str, salted: &str) -> bool {
    let Some(salt) = salted.get(..SALT_LEN) else {
        return false;
    };

    salted_hash(password, salt) == salted
}
