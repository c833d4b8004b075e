// src/core/biometry/mod.rs
mod camera;
mod capture;
mod detector;
mod enrollment;
mod error;
mod liveness;
mod matcher;
mod types;

pub use camera::{CameraGuard, CameraSource, CameraStream};
pub use capture::{CaptureSession, CaptureStatus, EnrollmentCapture, VerificationCapture};
pub use detector::{select_primary, DetectorUnavailable, FaceBiometryAdapter, FaceDetector};
pub use enrollment::{EnrollmentProgress, EnrollmentTracker, StreakSnapshot};
pub use error::BiometricError;
pub use liveness::check_liveness;
pub use matcher::{compare, euclidean_distance};
pub use types::{
    BiometryPolicy, BoundingBox, FaceDescriptor, FaceDetection, Frame, LivenessRejection,
    LivenessVerdict, MatchResult, Point,
};
