//! Image verdict fusion
//!
//! OR-fusion: any triggered signal or flagged face makes the image
//! SUSPICIOUS. A detected face with nothing else to report still adds a
//! neutral reason, so the report always shows that a face was present.

use crate::types::{FaceAnalysis, ImageVerdict, Signal};

pub const NEUTRAL_FACE_REASON: &str = "No clear issues, but face detected";

/// Reasons plus verdict
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFusion {
    pub reasons: Vec<String>,
    pub verdict: ImageVerdict,
}

/// Fuse the signals that were actually obtained; `faces` is None when face
/// analysis was unavailable
pub fn fuse(signals: &[Signal], faces: Option<&FaceAnalysis>) -> ImageFusion {
    let mut reasons: Vec<String> = signals
        .iter()
        .filter(|s| s.triggered)
        .map(|s| s.name.clone())
        .collect();

    if let Some(faces) = faces {
        reasons.extend(faces.flags.iter().map(|f| format!("Face issue: {}", f.kind)));
        if faces.face_detected() && reasons.is_empty() {
            reasons.push(NEUTRAL_FACE_REASON.to_string());
        }
    }

    let verdict = if reasons.is_empty() {
        ImageVerdict::Safe
    } else {
        ImageVerdict::Suspicious
    };
    ImageFusion { reasons, verdict }
}
