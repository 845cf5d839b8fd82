//! Credential digests for the SLID exchanges.
//!
//! The identity service expects lowercase hex: MD5 for the two application
//! exchanges, SHA-1 for the user password.

use md5::{Digest, Md5};
use sha1::Sha1;

/// MD5 hex of the raw application secret, sent when requesting an app code.
pub fn hash_app_secret(secret: &str) -> String {
    format!("{:x}", Md5::digest(secret.as_bytes()))
}

/// MD5 hex of `secret + code`, sent when requesting an app token.
pub fn hash_app_secret_with_code(secret: &str, code: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(secret.as_bytes());
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// SHA-1 hex of the raw user password, sent with the login request.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha1::digest(password.as_bytes()))
}
