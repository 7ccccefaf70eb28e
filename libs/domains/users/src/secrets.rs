//! Password hashing and one-time secrets.
//!
//! Passwords are argon2 PHC strings. OTPs, reset tokens and refresh tokens
//! are stored only as sha256 hex digests.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::error::{UserError, UserResult};

pub const OTP_LENGTH: usize = 6;

pub fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn sha256_hex(value: &str) -> String {
    const_hex::encode(Sha256::digest(value.as_bytes()))
}

/// Six decimal digits, leading zeros kept
pub fn generate_otp() -> String {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{code:0width$}", width = OTP_LENGTH)
}

/// 20 random bytes as 40 hex chars
pub fn generate_reset_token() -> String {
    let bytes: [u8; 20] = rand::rng().random();
    const_hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(verify_password("secret1", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_sha256_hex_is_stable() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_generate_otp_shape() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generate_reset_token_shape() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_reset_token());
    }
}
