use rand::distributions::{Alphanumeric, DistString};
use sha256::digest;

const SALT_LENGTH: usize = 16;

/// Hashes a password as `<salt>$<sha256(salt + password)>` with a fresh random salt
pub fn hash(password: &str) -> String {
    let salt = Alphanumeric.sample_string(&mut rand::thread_rng(), SALT_LENGTH);
    hash_with_salt(password, &salt)
}

pub fn verify(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, _)) => hash_with_salt(password, salt) == stored,
        None => false,
    }
}

fn hash_with_salt(password: &str, salt: &str) -> String {
    format!("{}${}", salt, digest(format!("{}{}", salt, password)))
}
