// src/core/biometry/capture.rs
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::camera::{CameraGuard, CameraSource};
use super::detector::FaceBiometryAdapter;
use super::enrollment::{EnrollmentProgress, EnrollmentTracker, StreakSnapshot};
use super::error::BiometricError;
use super::types::{FaceDescriptor, FaceDetection, Frame, MatchResult};

const HOLD_STILL: &str = "Mantenha o rosto na moldura";

/// What the capture screen should show right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CaptureStatus {
    Starting,
    Positioning { message: String, progress: StreakSnapshot },
    Complete,
    Failed { message: String, retryable: bool },
}

impl CaptureStatus {
    pub fn message(&self) -> &str {
        match self {
            CaptureStatus::Starting => "Iniciando câmera...",
            CaptureStatus::Positioning { message, .. } => message,
            CaptureStatus::Complete => "Rosto confirmado",
            CaptureStatus::Failed { message, .. } => message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnrollmentCapture {
    pub detection: FaceDetection,
    /// Frame that completed the streak, kept for the profile photo.
    pub snapshot: Frame,
    pub frames_polled: u32,
}

#[derive(Debug, Clone)]
pub struct VerificationCapture {
    pub descriptor: FaceDescriptor,
    pub result: MatchResult,
    pub frames_polled: u32,
}

/// One capture screen: owns the camera for its duration and drives the
/// per-frame detect → liveness loop.
///
/// The loop yields to the runtime after every frame. Dropping the returned
/// future cancels the attempt and releases the camera.
pub struct CaptureSession {
    adapter: Arc<FaceBiometryAdapter>,
    camera: Arc<dyn CameraSource>,
    frame_budget: Option<u32>,
    status: watch::Sender<CaptureStatus>,
}

impl CaptureSession {
    pub fn new(adapter: Arc<FaceBiometryAdapter>, camera: Arc<dyn CameraSource>) -> Self {
        let (status, _) = watch::channel(CaptureStatus::Starting);
        Self {
            adapter,
            camera,
            frame_budget: None,
            status,
        }
    }

    pub fn with_frame_budget(mut self, budget: Option<u32>) -> Self {
        self.frame_budget = budget;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<CaptureStatus> {
        self.status.subscribe()
    }

    /// Collects a stable streak of good frames and returns the descriptor of
    /// the frame that completed it.
    pub async fn enroll(&self) -> Result<EnrollmentCapture, BiometricError> {
        let result = self.run_enrollment().await;
        self.finish(&result);
        result
    }

    /// Captures the first frame that passes the gate and compares it with
    /// the enrolled descriptor. The caller decides what a mismatch means.
    pub async fn verify(&self, enrolled: &FaceDescriptor) -> Result<VerificationCapture, BiometricError> {
        let result = self.run_verification(enrolled).await;
        self.finish(&result);
        result
    }

    async fn run_enrollment(&self) -> Result<EnrollmentCapture, BiometricError> {
        self.status.send_replace(CaptureStatus::Starting);
        self.adapter.ensure_loaded().await?;
        let mut camera = CameraGuard::acquire(self.camera.as_ref()).await?;

        let mut tracker = EnrollmentTracker::new(self.adapter.policy());
        let mut frames = 0u32;

        loop {
            self.check_budget(frames)?;
            let frame = camera.next_frame().await?;
            frames += 1;

            let detection = self.adapter.detect(&frame).await?;
            let verdict = self.adapter.check_liveness(detection.as_ref(), frame.width, frame.height);

            match tracker.observe(&verdict, detection) {
                EnrollmentProgress::Complete(detection) => {
                    camera.release();
                    info!(frames, "Enrollment capture accepted");
                    return Ok(EnrollmentCapture {
                        detection: *detection,
                        snapshot: frame,
                        frames_polled: frames,
                    });
                }
                EnrollmentProgress::Collecting { .. } => {
                    self.status.send_replace(CaptureStatus::Positioning {
                        message: verdict.reason().unwrap_or(HOLD_STILL).to_string(),
                        progress: tracker.snapshot(),
                    });
                }
            }

            tokio::task::yield_now().await;
        }
    }

    async fn run_verification(&self, enrolled: &FaceDescriptor) -> Result<VerificationCapture, BiometricError> {
        self.status.send_replace(CaptureStatus::Starting);
        self.adapter.ensure_loaded().await?;
        let mut camera = CameraGuard::acquire(self.camera.as_ref()).await?;

        let mut frames = 0u32;

        loop {
            self.check_budget(frames)?;
            let frame = camera.next_frame().await?;
            frames += 1;

            let detection = self.adapter.detect(&frame).await?;
            let verdict = self.adapter.check_liveness(detection.as_ref(), frame.width, frame.height);

            if let (true, Some(detection)) = (verdict.is_valid(), detection) {
                camera.release();
                let result = self.adapter.compare(enrolled, &detection.descriptor)?;
                debug!(distance = result.distance, is_match = result.is_match, "Verification frame compared");
                return Ok(VerificationCapture {
                    descriptor: detection.descriptor,
                    result,
                    frames_polled: frames,
                });
            }

            self.status.send_replace(CaptureStatus::Positioning {
                message: verdict.reason().unwrap_or(HOLD_STILL).to_string(),
                progress: StreakSnapshot { streak: 0, required: 1, percent: 0 },
            });

            tokio::task::yield_now().await;
        }
    }

    fn check_budget(&self, frames: u32) -> Result<(), BiometricError> {
        match self.frame_budget {
            Some(budget) if frames >= budget => Err(BiometricError::CaptureTimedOut(frames)),
            _ => Ok(()),
        }
    }

    fn finish<T>(&self, result: &Result<T, BiometricError>) {
        match result {
            Ok(_) => {
                self.status.send_replace(CaptureStatus::Complete);
            }
            Err(e) => {
                warn!("Capture attempt failed: {}", e);
                self.status.send_replace(CaptureStatus::Failed {
                    message: e.user_message().to_string(),
                    retryable: e.is_retryable(),
                });
            }
        }
    }
}
