// src/utils/error.rs
use thiserror::Error;

use crate::core::biometry::BiometricError;
use crate::core::identity::SecurityMode;
use crate::storage::encrypted::StorageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Profile is set up for {0:?} login")]
    WrongSecurityMode(SecurityMode),

    #[error("Biometric error: {0}")]
    Biometric(#[from] BiometricError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    /// Stable machine-readable code used by the API layer.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Authentication(_) => "authentication",
            AppError::WrongSecurityMode(_) => "wrong_security_mode",
            AppError::Biometric(e) => e.code(),
            AppError::Storage(_) => "storage",
        }
    }

    /// Portuguese message shown to the fisher.
    ///
    /// Validation and authentication errors already carry a user-facing
    /// message; everything else maps to a fixed sentence.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Authentication(msg) => msg.clone(),
            AppError::NotFound(_) => "Cadastro não encontrado.".to_string(),
            AppError::Conflict(_) => "Já existe um cadastro com este CPF.".to_string(),
            AppError::WrongSecurityMode(SecurityMode::Pin) => {
                "Este cadastro usa PIN. Entre com sua senha de 4 dígitos.".to_string()
            }
            AppError::WrongSecurityMode(SecurityMode::Biometric) => {
                "Este cadastro usa Face ID. Entre com o seu rosto.".to_string()
            }
            AppError::Biometric(e) => e.user_message().to_string(),
            AppError::Config(_) | AppError::Storage(_) => {
                "Erro interno. Tente novamente mais tarde.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
