// src/core/biometry/types.rs
use serde::{Deserialize, Serialize};

use super::error::BiometricError;

/// Axis-aligned face box in frame pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Width over height. Zero-height boxes yield infinity and fail any
    /// aspect bound.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0.0 {
            return f64::INFINITY;
        }
        self.width / self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Fixed-length embedding summarising a detected face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct FaceDescriptor(Vec<f32>);

impl FaceDescriptor {
    pub fn new(values: Vec<f32>) -> Result<Self, BiometricError> {
        if values.is_empty() {
            return Err(BiometricError::InvalidDescriptor("descriptor is empty".into()));
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(BiometricError::InvalidDescriptor(format!(
                "component {} is not finite",
                index
            )));
        }
        Ok(Self(values))
    }

    /// Like [`FaceDescriptor::new`] but also enforces the recogniser's
    /// output length.
    pub fn with_length(values: Vec<f32>, expected: usize) -> Result<Self, BiometricError> {
        if values.len() != expected {
            return Err(BiometricError::DescriptorLength {
                expected,
                actual: values.len(),
            });
        }
        Self::new(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<f32>> for FaceDescriptor {
    type Error = BiometricError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<FaceDescriptor> for Vec<f32> {
    fn from(descriptor: FaceDescriptor) -> Self {
        descriptor.0
    }
}

/// One face found in one frame. Ephemeral: only the descriptor outlives
/// the frame, and only when it is enrolled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub bounding_box: BoundingBox,
    pub landmarks: Vec<Point>,
    pub descriptor: FaceDescriptor,
    pub score: f64,
}

/// Raw camera frame as handed over by the capture source.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }
}

/// Hand-tuned thresholds for the capture gate and the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiometryPolicy {
    /// Descriptors closer than this are the same person.
    pub match_threshold: f64,
    pub min_face_width_ratio: f64,
    pub max_face_width_ratio: f64,
    pub min_aspect_ratio: f64,
    pub max_aspect_ratio: f64,
    /// Allowed distance of the face center from the frame center, as a
    /// fraction of the frame size, per axis.
    pub max_center_offset: f64,
    pub min_detection_score: f64,
    /// Consecutive passing frames needed to accept an enrollment capture.
    pub required_streak: u32,
    /// Streak lost on each failing frame.
    pub failure_penalty: u32,
    pub descriptor_length: usize,
}

impl Default for BiometryPolicy {
    fn default() -> Self {
        Self {
            match_threshold: 0.6,
            min_face_width_ratio: 0.20,
            max_face_width_ratio: 0.80,
            min_aspect_ratio: 0.6,
            max_aspect_ratio: 1.4,
            max_center_offset: 0.25,
            min_detection_score: 0.5,
            required_streak: 15,
            failure_penalty: 2,
            descriptor_length: 128,
        }
    }
}

impl BiometryPolicy {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.match_threshold > 0.0) {
            return Err("biometry.policy.match_threshold must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.min_face_width_ratio)
            || !(0.0..=1.0).contains(&self.max_face_width_ratio)
            || self.min_face_width_ratio >= self.max_face_width_ratio
        {
            return Err("biometry.policy face width bounds must satisfy 0 <= min < max <= 1".into());
        }
        if !(self.min_aspect_ratio > 0.0) || self.min_aspect_ratio >= self.max_aspect_ratio {
            return Err("biometry.policy aspect bounds must satisfy 0 < min < max".into());
        }
        if !(0.0..=0.5).contains(&self.max_center_offset) {
            return Err("biometry.policy.max_center_offset must be within [0, 0.5]".into());
        }
        if !(0.0..=1.0).contains(&self.min_detection_score) {
            return Err("biometry.policy.min_detection_score must be within [0, 1]".into());
        }
        if self.required_streak == 0 {
            return Err("biometry.policy.required_streak must be greater than 0".into());
        }
        if self.descriptor_length == 0 {
            return Err("biometry.policy.descriptor_length must be greater than 0".into());
        }
        Ok(())
    }
}

/// Why a frame did not pass the capture gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LivenessRejection {
    NoFace,
    EmptyFrame,
    TooFar,
    TooClose,
    Distorted,
    OffCenter,
}

impl LivenessRejection {
    pub fn message(&self) -> &'static str {
        match self {
            LivenessRejection::NoFace => "Nenhuma face detectada",
            LivenessRejection::EmptyFrame => "Câmera sem imagem",
            LivenessRejection::TooFar => "Aproxime mais o rosto",
            LivenessRejection::TooClose => "Afaste um pouco o rosto",
            LivenessRejection::Distorted => "Rosto distorcido detectado",
            LivenessRejection::OffCenter => "Centralize o rosto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum LivenessVerdict {
    Accepted { confidence: f64 },
    Rejected { reason: LivenessRejection },
}

impl LivenessVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, LivenessVerdict::Accepted { .. })
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            LivenessVerdict::Accepted { .. } => None,
            LivenessVerdict::Rejected { reason } => Some(reason.message()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub is_match: bool,
    pub distance: f64,
    /// Display-only score in [0, 100].
    pub similarity: f64,
}
