//! Fused verdicts for both pipelines

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary image outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageVerdict {
    Safe,
    Suspicious,
}

impl ImageVerdict {
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Safe => "🟢",
            Self::Suspicious => "🔥",
        }
    }
}

impl fmt::Display for ImageVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Safe => "SAFE",
            Self::Suspicious => "SUSPICIOUS",
        };
        write!(f, "{}", name)
    }
}

/// Output of the text classifier capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDetection {
    /// Raw label from the model
    pub label: String,
    /// Score of that label
    pub score: f64,
    /// Label is one of the configured machine-authored labels
    pub likely_ai: bool,
}

impl AiDetection {
    pub fn verdict_label(&self) -> &'static str {
        if self.likely_ai {
            "Likely AI"
        } else {
            "Likely Human"
        }
    }
}

/// Article decision table outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallVerdict {
    PotentialAiMisinformation,
    PotentialMisinformation,
    LikelyAiGenerated,
    NoStrongIndicators,
}

impl OverallVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PotentialAiMisinformation => "Potential AI-Generated Misinformation Detected",
            Self::PotentialMisinformation => "Potential Misinformation (Not necessarily AI-generated)",
            Self::LikelyAiGenerated => "Likely AI-Generated (But claims appear supported)",
            Self::NoStrongIndicators => "No strong indicators of fake/misinformation",
        }
    }
}

impl fmt::Display for OverallVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
