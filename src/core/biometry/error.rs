// src/core/biometry/error.rs
use thiserror::Error;

/// Failures of the face capture and matching flow.
///
/// Everything here is terminal for the current attempt. Frames that fail the
/// liveness gate are not errors; they come back as a
/// [`LivenessVerdict`](super::LivenessVerdict) and the loop keeps polling.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BiometricError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("No camera device found")]
    DeviceNotFound,

    #[error("Camera device is busy")]
    DeviceBusy,

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Failed to load face models: {0}")]
    ModelLoad(String),

    #[error("Timed out loading face models after {0}s")]
    ModelLoadTimeout(u64),

    #[error("Face detection failed: {0}")]
    Detection(String),

    #[error("Descriptor mismatch (distance {distance:.4})")]
    DescriptorMismatch { distance: f64 },

    #[error("No face descriptor enrolled for this profile")]
    DescriptorMissing,

    #[error("Descriptor length mismatch: expected {expected}, got {actual}")]
    DescriptorLength { expected: usize, actual: usize },

    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Capture gave up after {0} frames")]
    CaptureTimedOut(u32),
}

impl BiometricError {
    pub fn code(&self) -> &'static str {
        match self {
            BiometricError::PermissionDenied => "permission_denied",
            BiometricError::DeviceNotFound => "device_not_found",
            BiometricError::DeviceBusy => "device_busy",
            BiometricError::Camera(_) => "camera",
            BiometricError::ModelLoad(_) => "model_load",
            BiometricError::ModelLoadTimeout(_) => "model_load_timeout",
            BiometricError::Detection(_) => "detection",
            BiometricError::DescriptorMismatch { .. } => "descriptor_mismatch",
            BiometricError::DescriptorMissing => "descriptor_missing",
            BiometricError::DescriptorLength { .. } => "descriptor_length",
            BiometricError::InvalidDescriptor(_) => "invalid_descriptor",
            BiometricError::CaptureTimedOut(_) => "capture_timed_out",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            BiometricError::PermissionDenied => {
                "Não foi possível acessar a câmera. Verifique as permissões."
            }
            BiometricError::DeviceNotFound => "Nenhuma câmera encontrada neste aparelho.",
            BiometricError::DeviceBusy => {
                "A câmera está sendo usada por outro aplicativo. Feche-o e tente de novo."
            }
            BiometricError::Camera(_) | BiometricError::Detection(_) => {
                "Erro ao usar a câmera. Tente novamente."
            }
            BiometricError::ModelLoad(_) | BiometricError::ModelLoadTimeout(_) => {
                "Não foi possível carregar o reconhecimento facial. Recarregue e tente de novo."
            }
            BiometricError::DescriptorMismatch { .. } => {
                "Rosto não reconhecido. Tente de novo ou refaça o cadastro."
            }
            BiometricError::DescriptorMissing => {
                "Nenhum rosto cadastrado. Refaça o cadastro do Face ID."
            }
            BiometricError::DescriptorLength { .. } | BiometricError::InvalidDescriptor(_) => {
                "Leitura do rosto inválida. Tente novamente."
            }
            BiometricError::CaptureTimedOut(_) => {
                "Não conseguimos ler seu rosto. Tente em um lugar mais iluminado."
            }
        }
    }

    /// Terminal for the attempt but worth offering a retry button.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            BiometricError::DescriptorMissing | BiometricError::DeviceNotFound
        )
    }
}
