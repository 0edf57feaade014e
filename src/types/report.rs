//! Write-once analysis reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    AiDetection, Claim, FaceStatus, ImageVerdict, OcrSummary, OverallVerdict, Signal,
};

/// Methodology note attached to every article report
pub const ARTICLE_METHODOLOGY: &str = "Content fetched via scraping; AI detection via a \
    RoBERTa text classifier (~80-90% accuracy); strict claim filtering; balanced web \
    searches for and against each claim. Human verification recommended.";

/// Fused image analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    pub id: String,
    /// Path or label the image came from
    pub source: String,
    pub analyzed_at: DateTime<Utc>,
    pub ocr: OcrSummary,
    /// Every computed signal, triggered or not, in extraction order
    pub signals: Vec<Signal>,
    pub faces: FaceStatus,
    /// Explanations, one per triggered signal or flagged face issue
    pub reasons: Vec<String>,
    pub verdict: ImageVerdict,
}

/// Fused article analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleReport {
    pub id: String,
    /// None for text submitted directly
    pub url: Option<String>,
    pub analyzed_at: DateTime<Utc>,
    /// Leading slice of the normalised text
    pub content_excerpt: String,
    /// None when the classifier was unavailable
    pub ai_detection: Option<AiDetection>,
    pub claims: Vec<Claim>,
    pub overall_verdict: OverallVerdict,
    pub methodology: String,
}

/// Either kind of report, as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Image(ImageReport),
    Article(ArticleReport),
}

impl Report {
    pub fn id(&self) -> &str {
        match self {
            Self::Image(r) => &r.id,
            Self::Article(r) => &r.id,
        }
    }
}
