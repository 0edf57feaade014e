//! Runtime configuration
//!
//! Built-in defaults come from the constants in `lib.rs`. A TOML file may
//! override any subset; missing sections and keys keep their defaults.
//!
//! ```toml
//! [image]
//! blur_threshold = 120.0
//! fake_keywords = ["fake", "deepfake"]
//!
//! [services]
//! tesseract_cmd = "/usr/local/bin/tesseract"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Keywords that mark an image caption as self-declared synthetic
pub const DEFAULT_FAKE_KEYWORDS: &[&str] = &[
    "fake", "ai generated", "not real", "deepfake", "simulation",
    "mockup", "test", "prototype", "demo", "generated",
];

/// Sentence fragments that indicate captions or page chrome rather than claims
pub const DEFAULT_BOILERPLATE_PHRASES: &[&str] = &[
    "read more", "ap photo", "breaking news", "photo", "smoke raises",
];

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub image: ImageConfig,
    pub article: ArticleConfig,
    pub services: ServicesConfig,
}

impl Config {
    /// Load from a TOML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&raw)
            }
        }
    }

    /// Parse TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Thresholds and tables for the image pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub blur_threshold: f64,
    pub face_blur_threshold: f64,
    pub skin_std_threshold: f64,
    pub min_skin_pixels: usize,
    pub min_face_confidence: f32,
    pub deskew_min_angle: f64,
    pub min_ocr_words: usize,
    pub min_ocr_confidence: f64,
    pub fake_keywords: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            blur_threshold: crate::BLUR_THRESHOLD,
            face_blur_threshold: crate::FACE_BLUR_THRESHOLD,
            skin_std_threshold: crate::SKIN_STD_THRESHOLD,
            min_skin_pixels: crate::MIN_SKIN_PIXELS,
            min_face_confidence: crate::MIN_FACE_CONFIDENCE,
            deskew_min_angle: crate::DESKEW_MIN_ANGLE,
            min_ocr_words: crate::MIN_OCR_WORDS,
            min_ocr_confidence: crate::MIN_OCR_CONFIDENCE,
            fake_keywords: to_owned(DEFAULT_FAKE_KEYWORDS),
        }
    }
}

/// Thresholds and tables for the article pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleConfig {
    pub claim_min_chars: usize,
    pub claim_max_chars: usize,
    pub max_claims: usize,
    pub caps_ratio_min_words: usize,
    pub max_caps_ratio: f64,
    pub boilerplate_phrases: Vec<String>,
    pub search_max_results: usize,
    pub search_concurrency: usize,
    pub search_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub classifier_timeout_secs: u64,
    pub content_max_chars: usize,
    pub classifier_max_chars: usize,
}

impl ArticleConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_secs(self.classifier_timeout_secs)
    }
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            claim_min_chars: crate::CLAIM_MIN_CHARS,
            claim_max_chars: crate::CLAIM_MAX_CHARS,
            max_claims: crate::MAX_CLAIMS,
            caps_ratio_min_words: crate::CAPS_RATIO_MIN_WORDS,
            max_caps_ratio: crate::MAX_CAPS_RATIO,
            boilerplate_phrases: to_owned(DEFAULT_BOILERPLATE_PHRASES),
            search_max_results: crate::SEARCH_MAX_RESULTS,
            search_concurrency: crate::SEARCH_CONCURRENCY,
            search_timeout_secs: crate::SEARCH_TIMEOUT_SECS,
            fetch_timeout_secs: crate::FETCH_TIMEOUT_SECS,
            classifier_timeout_secs: crate::CLASSIFIER_TIMEOUT_SECS,
            content_max_chars: crate::CONTENT_MAX_CHARS,
            classifier_max_chars: crate::CLASSIFIER_MAX_CHARS,
        }
    }
}

/// Locations and endpoints of the external capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Tesseract binary
    pub tesseract_cmd: String,
    /// Detector program invoked as `<cmd> --prototxt P --model M --image I`
    pub face_detector_cmd: String,
    pub face_prototxt: PathBuf,
    pub face_weights: PathBuf,
    /// Hugging Face style inference endpoint base
    pub classifier_endpoint: String,
    pub classifier_model: String,
    /// Environment variable holding the bearer token, if any
    pub classifier_token_env: String,
    /// Classifier labels that mean machine-authored
    pub ai_labels: Vec<String>,
    pub search_endpoint: String,
    pub user_agent: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".to_string(),
            face_detector_cmd: "face-detect".to_string(),
            face_prototxt: PathBuf::from("deploy.prototxt"),
            face_weights: PathBuf::from("res10_300x300_ssd_iter_140000_fp16.caffemodel"),
            classifier_endpoint: "https://api-inference.huggingface.co/models".to_string(),
            classifier_model: "openai-community/roberta-base-openai-detector".to_string(),
            classifier_token_env: "HF_API_TOKEN".to_string(),
            ai_labels: vec!["LABEL_1".to_string(), "Fake".to_string()],
            search_endpoint: "https://html.duckduckgo.com/html/".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
