// src/core/biometry/matcher.rs
use super::error::BiometricError;
use super::types::{FaceDescriptor, MatchResult};

/// Euclidean distance between two descriptors, accumulated in `f64`.
pub fn euclidean_distance(a: &FaceDescriptor, b: &FaceDescriptor) -> Result<f64, BiometricError> {
    if a.len() != b.len() {
        return Err(BiometricError::DescriptorLength {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let sum: f64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| {
            let diff = f64::from(*x) - f64::from(*y);
            diff * diff
        })
        .sum();

    Ok(sum.sqrt())
}

/// Decides whether two descriptors belong to the same face.
///
/// The match is strict (`distance < threshold`). `similarity` rescales the
/// distance linearly onto [0, 100] for display and plays no part in the
/// decision.
pub fn compare(
    a: &FaceDescriptor,
    b: &FaceDescriptor,
    threshold: f64,
) -> Result<MatchResult, BiometricError> {
    let distance = euclidean_distance(a, b)?;
    let similarity = (1.0 - distance / threshold).clamp(0.0, 1.0) * 100.0;

    Ok(MatchResult {
        is_match: distance < threshold,
        distance,
        similarity,
    })
}
