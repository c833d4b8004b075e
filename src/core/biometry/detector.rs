// src/core/biometry/detector.rs
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use super::error::BiometricError;
use super::liveness;
use super::matcher;
use super::types::{BiometryPolicy, FaceDescriptor, FaceDetection, Frame, LivenessVerdict, MatchResult};

/// Detector + landmark + recogniser backend.
///
/// Implementations wrap whatever runs the models (an on-device runtime, a
/// bridge to the browser, a test double). `detect_faces` returns every face
/// found in the frame, resized to frame coordinates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FaceDetector: Send + Sync {
    async fn load_models(&self) -> Result<(), BiometricError>;

    async fn detect_faces(&self, frame: &Frame) -> Result<Vec<FaceDetection>, BiometricError>;
}

/// Backend for builds without an on-device model runtime. Capture flows
/// fail with [`BiometricError::ModelLoad`]; the stateless gate and matcher
/// still work for front ends that run detection themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetectorUnavailable;

#[async_trait]
impl FaceDetector for DetectorUnavailable {
    async fn load_models(&self) -> Result<(), BiometricError> {
        Err(BiometricError::ModelLoad("no face model backend configured".into()))
    }

    async fn detect_faces(&self, _frame: &Frame) -> Result<Vec<FaceDetection>, BiometricError> {
        Err(BiometricError::ModelLoad("no face model backend configured".into()))
    }
}

/// Picks the single most confident face at or above `min_score`.
pub fn select_primary(detections: Vec<FaceDetection>, min_score: f64) -> Option<FaceDetection> {
    detections
        .into_iter()
        .filter(|d| d.score >= min_score)
        .max_by(|a, b| a.score.total_cmp(&b.score))
}

/// Front door to the face pipeline: model loading, per-frame detection,
/// the liveness gate and descriptor matching, all under one policy.
pub struct FaceBiometryAdapter {
    detector: Arc<dyn FaceDetector>,
    policy: BiometryPolicy,
    load_timeout: Duration,
    models: OnceCell<()>,
}

impl FaceBiometryAdapter {
    pub fn new(detector: Arc<dyn FaceDetector>, policy: BiometryPolicy, load_timeout: Duration) -> Self {
        Self {
            detector,
            policy,
            load_timeout,
            models: OnceCell::new(),
        }
    }

    pub fn policy(&self) -> &BiometryPolicy {
        &self.policy
    }

    pub fn models_loaded(&self) -> bool {
        self.models.initialized()
    }

    /// Loads the models once. A failed or timed-out load leaves the adapter
    /// unloaded so a later call can retry.
    pub async fn ensure_loaded(&self) -> Result<(), BiometricError> {
        self.models
            .get_or_try_init(|| async {
                info!("Loading face models...");
                match tokio::time::timeout(self.load_timeout, self.detector.load_models()).await {
                    Ok(Ok(())) => {
                        info!("Face models loaded successfully");
                        Ok(())
                    }
                    Ok(Err(e)) => {
                        error!("Error loading face models: {}", e);
                        Err(e)
                    }
                    Err(_) => {
                        error!("Face model load exceeded {:?}", self.load_timeout);
                        Err(BiometricError::ModelLoadTimeout(self.load_timeout.as_secs()))
                    }
                }
            })
            .await
            .map(|_| ())
    }

    /// Runs detection on one frame and returns the primary face, if any.
    pub async fn detect(&self, frame: &Frame) -> Result<Option<FaceDetection>, BiometricError> {
        self.ensure_loaded().await?;

        let detections = self.detector.detect_faces(frame).await?;
        let found = detections.len();
        let primary = select_primary(detections, self.policy.min_detection_score);

        if let Some(ref detection) = primary {
            if detection.descriptor.len() != self.policy.descriptor_length {
                return Err(BiometricError::DescriptorLength {
                    expected: self.policy.descriptor_length,
                    actual: detection.descriptor.len(),
                });
            }
        }

        debug!(found, selected = primary.is_some(), "Frame processed");
        Ok(primary)
    }

    pub fn check_liveness(
        &self,
        detection: Option<&FaceDetection>,
        frame_width: u32,
        frame_height: u32,
    ) -> LivenessVerdict {
        liveness::check_liveness(detection, frame_width, frame_height, &self.policy)
    }

    pub fn compare(&self, a: &FaceDescriptor, b: &FaceDescriptor) -> Result<MatchResult, BiometricError> {
        matcher::compare(a, b, self.policy.match_threshold)
    }
}
