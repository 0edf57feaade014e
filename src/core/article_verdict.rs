//! Article verdict fusion
//!
//! | likely AI | claims look false | verdict                          |
//! |-----------|-------------------|----------------------------------|
//! | yes       | yes               | Potential AI-Generated Misinfo   |
//! | no        | yes               | Potential Misinformation         |
//! | yes       | no                | Likely AI-Generated              |
//! | no        | no                | No strong indicators             |

use crate::adapters::Classification;
use crate::types::{AiDetection, Claim, OverallVerdict};

/// Interpret a classifier label against the machine-authored label set
pub fn ai_detection(classification: Classification, ai_labels: &[String]) -> AiDetection {
    let likely_ai = ai_labels
        .iter()
        .any(|l| l.eq_ignore_ascii_case(&classification.label));
    AiDetection {
        label: classification.label,
        score: classification.score,
        likely_ai,
    }
}

/// Fixed decision table
pub fn decide(likely_ai: bool, claims_false: bool) -> OverallVerdict {
    match (likely_ai, claims_false) {
        (true, true) => OverallVerdict::PotentialAiMisinformation,
        (false, true) => OverallVerdict::PotentialMisinformation,
        (true, false) => OverallVerdict::LikelyAiGenerated,
        (false, false) => OverallVerdict::NoStrongIndicators,
    }
}

/// Fuse over whatever was obtained; a missing AI signal counts as "not AI"
pub fn fuse(ai: Option<&AiDetection>, claims: &[Claim]) -> OverallVerdict {
    let likely_ai = ai.map_or(false, |a| a.likely_ai);
    let claims_false = claims.iter().any(|c| c.verdict.is_against());
    decide(likely_ai, claims_false)
}
