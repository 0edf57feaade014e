//! External capabilities behind narrow traits
//!
//! Every backend here is swappable; `stub` holds deterministic versions
//! used by the tests and by callers that want to disable a capability.

use async_trait::async_trait;
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};
use crate::types::{FaceDetection, OcrOutput};

pub mod classifier;
pub mod face_detector;
pub mod fetch;
pub mod search;
pub mod stub;
pub mod tesseract;

pub use classifier::HfClassifier;
pub use face_detector::{CommandFaceDetector, FaceModelAssets};
pub use fetch::WebFetcher;
pub use search::DuckDuckGoSearch;
pub use tesseract::TesseractOcr;

/// Text recognition over a preprocessed binary image
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<OcrOutput>;
}

/// Face localisation; boxes are normalised to 0..1
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &RgbImage) -> Result<Vec<FaceDetection>>;
}

/// Top label of a text classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

/// Machine- vs human-authorship classifier
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification>;
}

/// One web search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Web search provider
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

/// URL → cleaned plain text; failures are values, not panics
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}
