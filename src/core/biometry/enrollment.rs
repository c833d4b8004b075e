// src/core/biometry/enrollment.rs
use serde::Serialize;

use super::types::{BiometryPolicy, FaceDetection, LivenessVerdict};

/// Where an enrollment attempt stands after the latest frame.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrollmentProgress {
    Collecting { streak: u32, required: u32 },
    Complete(Box<FaceDetection>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakSnapshot {
    pub streak: u32,
    pub required: u32,
    pub percent: u8,
}

/// Requires a sustained run of good frames before a capture is accepted.
///
/// Passing frames grow the streak by one; failing frames shrink it by the
/// configured penalty (saturating at zero), so decay is faster than growth.
#[derive(Debug, Clone)]
pub struct EnrollmentTracker {
    streak: u32,
    required: u32,
    penalty: u32,
}

impl EnrollmentTracker {
    pub fn new(policy: &BiometryPolicy) -> Self {
        Self {
            streak: 0,
            required: policy.required_streak.max(1),
            penalty: policy.failure_penalty,
        }
    }

    pub fn observe(
        &mut self,
        verdict: &LivenessVerdict,
        detection: Option<FaceDetection>,
    ) -> EnrollmentProgress {
        match (verdict.is_valid(), detection) {
            (true, Some(detection)) => {
                self.streak += 1;
                if self.streak >= self.required {
                    self.streak = self.required;
                    return EnrollmentProgress::Complete(Box::new(detection));
                }
            }
            _ => {
                self.streak = self.streak.saturating_sub(self.penalty);
            }
        }

        EnrollmentProgress::Collecting {
            streak: self.streak,
            required: self.required,
        }
    }

    pub fn reset(&mut self) {
        self.streak = 0;
    }

    pub fn snapshot(&self) -> StreakSnapshot {
        let percent = (u64::from(self.streak) * 100 / u64::from(self.required)).min(100) as u8;
        StreakSnapshot {
            streak: self.streak,
            required: self.required,
            percent,
        }
    }
}
