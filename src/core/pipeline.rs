//! End-to-end orchestrators
//!
//! `ImagePipeline`: preprocess → OCR signals → blur → faces → fusion.
//! `ArticlePipeline`: fetch → classify → claims → evidence → fusion.
//!
//! Capabilities are shared `Arc` services built once per process. Each
//! analysis is a self-contained value flow; nothing is mutated across runs.

use chrono::Utc;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::article_verdict;
use super::blur::blur_signal;
use super::claims::ClaimExtractor;
use super::evidence::EvidenceChecker;
use super::face::analyze_faces;
use super::image_verdict;
use super::ocr_signal::{ocr_signals, summarize};
use super::preprocess::{decode_image, load_image, preprocess};
use super::report::report_id;
use crate::adapters::fetch::truncate_chars;
use crate::adapters::{ContentFetcher, FaceDetector, OcrEngine, TextClassifier, WebSearch};
use crate::config::{ArticleConfig, Config, ImageConfig};
use crate::error::{Error, Result};
use crate::types::{ArticleReport, FaceStatus, ImageReport, OcrOutput, ARTICLE_METHODOLOGY};

/// Characters of normalised text kept in an article report
pub const EXCERPT_CHARS: usize = 300;

/// Face capability, or why it is off
#[derive(Clone)]
enum FaceBackend {
    Enabled(Arc<dyn FaceDetector>),
    Disabled(String),
}

/// Image forensics pipeline
#[derive(Clone)]
pub struct ImagePipeline {
    config: ImageConfig,
    ocr: Arc<dyn OcrEngine>,
    faces: FaceBackend,
}

impl ImagePipeline {
    /// Pipeline with face analysis disabled until a detector is attached
    pub fn new(config: ImageConfig, ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            config,
            ocr,
            faces: FaceBackend::Disabled("no face detector configured".to_string()),
        }
    }

    pub fn with_face_detector(mut self, detector: Arc<dyn FaceDetector>) -> Self {
        self.faces = FaceBackend::Enabled(detector);
        self
    }

    pub fn without_faces(mut self, reason: impl Into<String>) -> Self {
        self.faces = FaceBackend::Disabled(reason.into());
        self
    }

    pub fn faces_enabled(&self) -> bool {
        matches!(self.faces, FaceBackend::Enabled(_))
    }

    /// Analyze an image file
    pub fn analyze_path(&self, path: &Path) -> Result<ImageReport> {
        let image = load_image(path)?;
        Ok(self.analyze(&image, &path.display().to_string()))
    }

    /// Analyze encoded image bytes
    pub fn analyze_bytes(&self, bytes: &[u8], source: &str) -> Result<ImageReport> {
        let image = decode_image(bytes)?;
        Ok(self.analyze(&image, source))
    }

    /// Analyze a decoded image; never fails, unavailable signals are skipped
    pub fn analyze(&self, image: &DynamicImage, source: &str) -> ImageReport {
        let prepared = preprocess(image, self.config.deskew_min_angle);
        let raw = self.ocr.recognize(&prepared.image).unwrap_or_else(|e| {
            warn!(error = %e, "OCR failed, continuing with empty text");
            OcrOutput::empty()
        });
        let ocr = summarize(&raw, self.config.min_ocr_words);
        debug!(words = ocr.word_count, confidence = ocr.avg_confidence, "OCR summary");

        let mut signals = ocr_signals(&ocr, &self.config);
        signals.push(blur_signal(image, self.config.blur_threshold));

        let faces = match &self.faces {
            FaceBackend::Enabled(detector) => {
                match analyze_faces(&image.to_rgb8(), detector.as_ref(), &self.config) {
                    Ok(analysis) => FaceStatus::Analyzed(analysis),
                    Err(e) => {
                        warn!(error = %e, "face analysis unavailable");
                        FaceStatus::Disabled { reason: e.to_string() }
                    }
                }
            }
            FaceBackend::Disabled(reason) => FaceStatus::Disabled { reason: reason.clone() },
        };

        let fusion = image_verdict::fuse(&signals, faces.analysis());
        info!(source, verdict = %fusion.verdict, reasons = fusion.reasons.len(), "image analyzed");

        ImageReport {
            id: report_id("image", source),
            source: source.to_string(),
            analyzed_at: Utc::now(),
            ocr,
            signals,
            faces,
            reasons: fusion.reasons,
            verdict: fusion.verdict,
        }
    }
}

/// Misinformation pipeline
#[derive(Clone)]
pub struct ArticlePipeline {
    config: ArticleConfig,
    ai_labels: Vec<String>,
    fetcher: Arc<dyn ContentFetcher>,
    classifier: Arc<dyn TextClassifier>,
    extractor: ClaimExtractor,
    checker: EvidenceChecker,
}

impl ArticlePipeline {
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn ContentFetcher>,
        classifier: Arc<dyn TextClassifier>,
        search: Arc<dyn WebSearch>,
    ) -> Self {
        Self {
            config: config.article.clone(),
            ai_labels: config.services.ai_labels.clone(),
            fetcher,
            classifier,
            extractor: ClaimExtractor::new(&config.article),
            checker: EvidenceChecker::new(search, &config.article),
        }
    }

    /// Fetch and analyze a web article
    pub async fn analyze_url(&self, url: &str) -> Result<ArticleReport> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::InvalidInput("URL is empty".to_string()));
        }
        info!(url, "fetching article");
        let text = self.fetcher.fetch(url).await?;
        self.analyze_text(&text, Some(url)).await
    }

    /// Analyze already-extracted article text
    pub async fn analyze_text(&self, text: &str, url: Option<&str>) -> Result<ArticleReport> {
        let text = normalize(text);
        if text.is_empty() {
            return Err(Error::InvalidInput("no text to analyze".to_string()));
        }

        let classifier_input = truncate_chars(&text, self.config.classifier_max_chars);
        let ai_detection = match self.classifier.classify(&classifier_input).await {
            Ok(c) => Some(article_verdict::ai_detection(c, &self.ai_labels)),
            Err(e) => {
                warn!(error = %e, "AI detection unavailable");
                None
            }
        };

        let claims = self.extractor.extract(&text);
        debug!(claims = claims.len(), "claims extracted");
        let claims = self.checker.check_all(claims).await;

        let overall_verdict = article_verdict::fuse(ai_detection.as_ref(), &claims);
        info!(verdict = %overall_verdict, claims = claims.len(), "article analyzed");

        Ok(ArticleReport {
            id: report_id("article", url.unwrap_or(&text)),
            url: url.map(str::to_string),
            analyzed_at: Utc::now(),
            content_excerpt: truncate_chars(&text, EXCERPT_CHARS),
            ai_detection,
            claims,
            overall_verdict,
            methodology: ARTICLE_METHODOLOGY.to_string(),
        })
    }
}

/// Collapse whitespace runs and trim
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stub::{StaticClassifier, StaticFaceDetector, StaticFetcher, StaticOcr, StaticSearch};
    use crate::error::FetchError;
    use crate::types::{BoundingBox, FaceDetection, ImageVerdict, OverallVerdict};
    use image::{Rgb, RgbImage};

    fn flat_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([128, 128, 128])))
    }

    fn article(search: StaticSearch, classifier: StaticClassifier) -> ArticlePipeline {
        ArticlePipeline::new(
            &Config::default(),
            Arc::new(StaticFetcher::page("")),
            Arc::new(classifier),
            Arc::new(search),
        )
    }

    #[test]
    fn test_ocr_failure_degrades() {
        let pipeline = ImagePipeline::new(ImageConfig::default(), Arc::new(StaticOcr::failing()));
        let report = pipeline.analyze(&flat_image(), "flat.png");
        assert_eq!(report.ocr.word_count, 0);
        assert!(!report.ocr.reliable);
        assert_eq!(report.verdict, ImageVerdict::Suspicious);
        assert!(report.reasons.contains(&"Low OCR word count".to_string()));
    }

    #[test]
    fn test_faces_disabled_by_default() {
        let pipeline = ImagePipeline::new(ImageConfig::default(), Arc::new(StaticOcr::failing()));
        assert!(!pipeline.faces_enabled());
        let report = pipeline.analyze(&flat_image(), "flat.png");
        assert!(matches!(report.faces, FaceStatus::Disabled { .. }));
    }

    #[test]
    fn test_face_regions_reported() {
        let detector = StaticFaceDetector::new(vec![FaceDetection {
            confidence: 0.95,
            bbox: BoundingBox::new(0.25, 0.25, 0.75, 0.75),
        }]);
        let pipeline = ImagePipeline::new(
            ImageConfig::default(),
            Arc::new(StaticOcr::words("one two three four", 90)),
        )
        .with_face_detector(Arc::new(detector));

        let report = pipeline.analyze(&flat_image(), "face.png");
        let analysis = report.faces.analysis().unwrap();
        assert_eq!(analysis.regions.len(), 1);
        assert!(report.reasons.contains(&"Face issue: blurry".to_string()));
    }

    #[test]
    fn test_undecodable_bytes() {
        let pipeline = ImagePipeline::new(ImageConfig::default(), Arc::new(StaticOcr::failing()));
        assert!(matches!(
            pipeline.analyze_bytes(b"\x00\x01garbage", "upload"),
            Err(Error::ImageLoad(_))
        ));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  a \n\t b  c "), "a b c");
    }

    #[tokio::test]
    async fn test_empty_inputs_rejected() {
        let pipeline = article(StaticSearch::default(), StaticClassifier::new("LABEL_0", 0.9));
        assert!(matches!(pipeline.analyze_url("  ").await, Err(Error::InvalidInput(_))));
        assert!(matches!(pipeline.analyze_text(" \n ", None).await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_blocked_fetch_surfaces() {
        let pipeline = ArticlePipeline::new(
            &Config::default(),
            Arc::new(StaticFetcher::error(FetchError::Blocked { status: 403 })),
            Arc::new(StaticClassifier::new("LABEL_0", 0.9)),
            Arc::new(StaticSearch::default()),
        );
        let err = pipeline.analyze_url("https://example.com/a").await.unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::Blocked { status: 403 })));
    }

    #[tokio::test]
    async fn test_classifier_failure_still_fuses() {
        let pipeline = article(StaticSearch::default(), StaticClassifier::failing());
        let report = pipeline
            .analyze_text("Nothing much here to read at all.", None)
            .await
            .unwrap();
        assert!(report.ai_detection.is_none());
        assert!(report.claims.is_empty());
        assert_eq!(report.overall_verdict, OverallVerdict::NoStrongIndicators);
        assert!(report.id.starts_with("article_"));
    }

    #[tokio::test]
    async fn test_excerpt_is_bounded() {
        let pipeline = article(StaticSearch::default(), StaticClassifier::new("LABEL_0", 0.9));
        let text = "word ".repeat(200);
        let report = pipeline.analyze_text(&text, None).await.unwrap();
        assert_eq!(report.content_excerpt.chars().count(), EXCERPT_CHARS);
    }
}
