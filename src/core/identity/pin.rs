// src/core/identity/pin.rs
use rand::{rngs::OsRng, RngCore};
use sha3::{Digest, Sha3_256};

use super::types::SecurityCredential;
use crate::utils::error::{AppError, Result};

pub const PIN_LENGTH: usize = 4;
const SALT_LEN: usize = 16;

pub const PIN_MISMATCH: &str = "Os PINs não conferem ou são inválidos.";

/// A PIN is exactly four ASCII digits and must be typed twice.
pub fn validate_pin(pin: &str, confirmation: &str) -> Result<()> {
    let well_formed = pin.len() == PIN_LENGTH && pin.bytes().all(|b| b.is_ascii_digit());
    if !well_formed || pin != confirmation {
        return Err(AppError::Validation(PIN_MISMATCH.into()));
    }
    Ok(())
}

/// Builds a PIN credential with a fresh random salt.
pub fn pin_credential(pin: &str) -> SecurityCredential {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    SecurityCredential::Pin {
        hash: digest(pin, &salt),
        salt: hex::encode(salt),
    }
}

pub fn verify_pin(pin: &str, hash: &str, salt: &str) -> bool {
    let salt = match hex::decode(salt) {
        Ok(salt) => salt,
        Err(_) => return false,
    };
    let candidate = digest(pin, &salt);

    // Equal-time comparison of the hex digests.
    candidate.len() == hash.len()
        && candidate
            .bytes()
            .zip(hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn digest(pin: &str, salt: &[u8]) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(salt);
    hasher.update(pin.as_bytes());
    hex::encode(hasher.finalize())
}
