//! OCR capability output and its derived summary

use serde::{Deserialize, Serialize};

/// Confidence value the OCR engine uses for "no recognition"
pub const NO_RECOGNITION: i32 = -1;

/// Raw OCR engine output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrOutput {
    /// Full recognised text
    pub text: String,
    /// Per-token confidences, `NO_RECOGNITION` for non-word entries
    pub confidences: Vec<i32>,
    /// Per-token strings, possibly blank
    pub tokens: Vec<String>,
}

impl OcrOutput {
    /// Degraded result used when OCR fails
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Reliability summary of one OCR run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrSummary {
    pub text: String,
    /// Non-blank tokens
    pub word_count: usize,
    /// Mean of valid confidences, 0 when none are valid
    pub avg_confidence: f64,
    /// False when too few words were read for keyword matching
    pub reliable: bool,
}
