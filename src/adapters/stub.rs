//! Deterministic capability backends
//!
//! Used by tests and wherever a real backend is unavailable.

use async_trait::async_trait;
use image::{GrayImage, RgbImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{
    Classification, ContentFetcher, FaceDetector, OcrEngine, SearchHit, TextClassifier, WebSearch,
};
use crate::error::{Error, FetchError, Result};
use crate::types::{FaceDetection, OcrOutput};

/// Returns a fixed OCR result, or fails every call
#[derive(Debug, Clone)]
pub struct StaticOcr {
    output: Option<OcrOutput>,
}

impl StaticOcr {
    pub fn new(output: OcrOutput) -> Self {
        Self { output: Some(output) }
    }

    /// Whitespace-separated words, all at the same confidence
    pub fn words(text: &str, confidence: i32) -> Self {
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        Self::new(OcrOutput {
            text: text.to_string(),
            confidences: vec![confidence; tokens.len()],
            tokens,
        })
    }

    pub fn failing() -> Self {
        Self { output: None }
    }
}

impl OcrEngine for StaticOcr {
    fn recognize(&self, _image: &GrayImage) -> Result<OcrOutput> {
        self.output
            .clone()
            .ok_or_else(|| Error::Ocr("stub OCR failure".to_string()))
    }
}

/// Returns fixed detections for every image
#[derive(Debug, Clone, Default)]
pub struct StaticFaceDetector {
    pub detections: Vec<FaceDetection>,
}

impl StaticFaceDetector {
    pub fn new(detections: Vec<FaceDetection>) -> Self {
        Self { detections }
    }
}

impl FaceDetector for StaticFaceDetector {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<FaceDetection>> {
        Ok(self.detections.clone())
    }
}

/// Returns a fixed label, or fails every call
#[derive(Debug, Clone)]
pub struct StaticClassifier {
    result: Option<Classification>,
}

impl StaticClassifier {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            result: Some(Classification {
                label: label.into(),
                score,
            }),
        }
    }

    pub fn failing() -> Self {
        Self { result: None }
    }
}

#[async_trait]
impl TextClassifier for StaticClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification> {
        self.result
            .clone()
            .ok_or_else(|| Error::Classifier("stub classifier failure".to_string()))
    }
}

/// Canned evidence per claim
///
/// A query is a refutation query when it contains "debunked". Rules are
/// matched by substring against the query, first match wins.
#[derive(Debug, Default)]
pub struct StaticSearch {
    rules: Vec<SearchRule>,
    default_support: Vec<String>,
    default_challenge: Vec<String>,
    calls: AtomicUsize,
}

#[derive(Debug, Clone)]
struct SearchRule {
    needle: String,
    support: Option<Vec<String>>,
    challenge: Option<Vec<String>>,
    delay: Option<Duration>,
}

impl StaticSearch {
    /// Same links for every claim
    pub fn uniform(support: &[&str], challenge: &[&str]) -> Self {
        Self {
            default_support: owned(support),
            default_challenge: owned(challenge),
            ..Self::default()
        }
    }

    /// Evidence for queries mentioning `needle`
    pub fn with_claim(mut self, needle: &str, support: &[&str], challenge: &[&str]) -> Self {
        self.rules.push(SearchRule {
            needle: needle.to_string(),
            support: Some(owned(support)),
            challenge: Some(owned(challenge)),
            delay: None,
        });
        self
    }

    /// Queries mentioning `needle` fail
    pub fn failing_for(mut self, needle: &str) -> Self {
        self.rules.push(SearchRule {
            needle: needle.to_string(),
            support: None,
            challenge: None,
            delay: None,
        });
        self
    }

    /// Queries mentioning `needle` answer with no links after `delay`
    pub fn slow_for(mut self, needle: &str, delay: Duration) -> Self {
        self.rules.push(SearchRule {
            needle: needle.to_string(),
            support: Some(Vec::new()),
            challenge: Some(Vec::new()),
            delay: Some(delay),
        });
        self
    }

    /// Number of search calls served
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearch for StaticSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let refuting = query.contains("debunked");

        let urls = match self.rules.iter().find(|r| query.contains(&r.needle)) {
            Some(rule) => {
                if let Some(delay) = rule.delay {
                    tokio::time::sleep(delay).await;
                }
                let links = if refuting { &rule.challenge } else { &rule.support };
                links
                    .clone()
                    .ok_or_else(|| Error::Search("stub search failure".to_string()))?
            }
            None if refuting => self.default_challenge.clone(),
            None => self.default_support.clone(),
        };

        Ok(urls
            .into_iter()
            .take(max_results)
            .map(|url| SearchHit {
                title: url.clone(),
                snippet: String::new(),
                url,
            })
            .collect())
    }
}

/// Serves one fixed page or error
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    result: std::result::Result<String, FetchError>,
}

impl StaticFetcher {
    pub fn page(text: impl Into<String>) -> Self {
        Self { result: Ok(text.into()) }
    }

    pub fn error(error: FetchError) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> std::result::Result<String, FetchError> {
        self.result.clone()
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
