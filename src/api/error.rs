// src/api/error.rs
use actix_web::{
    error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError,
};
use serde::Serialize;
use tracing::warn;

use crate::core::biometry::BiometricError;
use crate::utils::error::AppError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::WrongSecurityMode(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Biometric(e) => biometric_status(e),
            AppError::Config(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.code(),
            message: self.user_message(),
        })
    }
}

fn biometric_status(error: &BiometricError) -> StatusCode {
    match error {
        BiometricError::DescriptorMismatch { .. } => StatusCode::UNAUTHORIZED,
        BiometricError::DescriptorMissing => StatusCode::CONFLICT,
        BiometricError::DescriptorLength { .. } | BiometricError::InvalidDescriptor(_) => {
            StatusCode::BAD_REQUEST
        }
        BiometricError::PermissionDenied => StatusCode::FORBIDDEN,
        BiometricError::CaptureTimedOut(_) => StatusCode::REQUEST_TIMEOUT,
        BiometricError::DeviceNotFound
        | BiometricError::DeviceBusy
        | BiometricError::ModelLoad(_)
        | BiometricError::ModelLoadTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        BiometricError::Camera(_) | BiometricError::Detection(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Keeps malformed bodies in the same `{error, message}` shape.
pub fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = %req.path(), "Rejected request body: {}", err);
    AppError::Validation("Não foi possível ler os dados enviados.".into()).into()
}
