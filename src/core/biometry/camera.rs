// src/core/biometry/camera.rs
use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::BiometricError;
use super::types::Frame;

/// Opens the front camera. Permission, absence and busy devices map to the
/// matching [`BiometricError`] variants.
#[async_trait]
pub trait CameraSource: Send + Sync {
    async fn open(&self) -> Result<Box<dyn CameraStream>, BiometricError>;
}

/// A live media stream. `stop` ends every track and must be idempotent.
#[async_trait]
pub trait CameraStream: Send {
    async fn next_frame(&mut self) -> Result<Frame, BiometricError>;

    fn stop(&mut self);
}

/// Owns an open stream for the lifetime of a capture screen and stops it on
/// every exit path, including when the owning future is dropped.
pub struct CameraGuard {
    stream: Option<Box<dyn CameraStream>>,
}

impl CameraGuard {
    pub async fn acquire(source: &dyn CameraSource) -> Result<Self, BiometricError> {
        let stream = source.open().await.map_err(|e| {
            warn!("Camera error: {}", e);
            e
        })?;
        debug!("Camera stream acquired");
        Ok(Self { stream: Some(stream) })
    }

    pub async fn next_frame(&mut self) -> Result<Frame, BiometricError> {
        match self.stream.as_mut() {
            Some(stream) => stream.next_frame().await,
            None => Err(BiometricError::Camera("stream already released".into())),
        }
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("Camera stream released");
        }
    }
}

impl Drop for CameraGuard {
    fn drop(&mut self) {
        self.release();
    }
}
