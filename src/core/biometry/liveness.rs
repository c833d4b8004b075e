// src/core/biometry/liveness.rs
use super::types::{BiometryPolicy, FaceDetection, LivenessRejection, LivenessVerdict};

/// Passive framing gate applied to every captured frame.
///
/// Checks run in a fixed order (size, aspect, centering) and the first
/// failure decides the reason shown to the user. This only filters badly
/// framed captures; a printed photo at the right distance passes.
pub fn check_liveness(
    detection: Option<&FaceDetection>,
    frame_width: u32,
    frame_height: u32,
    policy: &BiometryPolicy,
) -> LivenessVerdict {
    let detection = match detection {
        Some(d) => d,
        None => return rejected(LivenessRejection::NoFace),
    };

    if frame_width == 0 || frame_height == 0 {
        return rejected(LivenessRejection::EmptyFrame);
    }

    let frame_w = f64::from(frame_width);
    let frame_h = f64::from(frame_height);
    let bbox = &detection.bounding_box;

    // NaN or degenerate boxes would slip past every comparison below.
    let finite = [bbox.x, bbox.y, bbox.width, bbox.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite || bbox.width <= 0.0 || bbox.height <= 0.0 {
        return rejected(LivenessRejection::Distorted);
    }

    let width_ratio = bbox.width / frame_w;
    if width_ratio < policy.min_face_width_ratio {
        return rejected(LivenessRejection::TooFar);
    }
    if width_ratio > policy.max_face_width_ratio {
        return rejected(LivenessRejection::TooClose);
    }

    let aspect = bbox.aspect_ratio();
    if aspect < policy.min_aspect_ratio || aspect > policy.max_aspect_ratio {
        return rejected(LivenessRejection::Distorted);
    }

    let (center_x, center_y) = bbox.center();
    let offset_x = (center_x / frame_w - 0.5).abs();
    let offset_y = (center_y / frame_h - 0.5).abs();
    if offset_x > policy.max_center_offset || offset_y > policy.max_center_offset {
        return rejected(LivenessRejection::OffCenter);
    }

    LivenessVerdict::Accepted {
        confidence: detection.score,
    }
}

fn rejected(reason: LivenessRejection) -> LivenessVerdict {
    LivenessVerdict::Rejected { reason }
}
