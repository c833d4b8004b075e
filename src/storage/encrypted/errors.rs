// src/storage/encrypted/errors.rs
use thiserror::Error;

/// Failures of the encrypted profile and record store.
///
/// Cipher and redb errors arrive as strings; callers only branch on the
/// variant, e.g. a record that no longer decrypts under the current key.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Encryption error: {0}")]
    EncryptionError(String),

    /// Wrong key or tampered ciphertext.
    #[error("Decryption error: {0}")]
    DecryptionError(String),

    #[error("Key management error: {0}")]
    KeyError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Plaintext decrypted but did not deserialize as the expected record.
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Flattens redb's per-operation error types.
pub(crate) fn db_error<E: std::fmt::Display>(error: E) -> StorageError {
    StorageError::DatabaseError(error.to_string())
}
