//! Veracity: weak-signal authenticity triage
//!
//! Image path: preprocess → OCR / blur / face signals → OR-fusion verdict
//! Article path: fetch → claims → evidence search → AI signal → decision table

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use error::{Error, Result};

// =============================================================================
// IMAGE THRESHOLDS
// =============================================================================

/// Laplacian variance below this marks the whole image as blurry
pub const BLUR_THRESHOLD: f64 = 100.0;

/// Laplacian variance below this marks a face region as blurry
pub const FACE_BLUR_THRESHOLD: f64 = 80.0;

/// Max per-channel std of skin pixels above this is flagged
/// Studio portraits often exceed 30, hence the higher bar
pub const SKIN_STD_THRESHOLD: f64 = 45.0;

/// Skin check is skipped below this many masked pixels
pub const MIN_SKIN_PIXELS: usize = 500;

/// Detections under this confidence are ignored
pub const MIN_FACE_CONFIDENCE: f32 = 0.5;

/// Deskew rotations at or below this angle (degrees) are skipped
pub const DESKEW_MIN_ANGLE: f64 = 0.5;

/// Fewer OCR words than this marks OCR unreliable
pub const MIN_OCR_WORDS: usize = 3;

/// Average OCR confidence below this is flagged
pub const MIN_OCR_CONFIDENCE: f64 = 50.0;

/// Weights files smaller than this are treated as truncated downloads
pub const MIN_FACE_WEIGHTS_BYTES: u64 = 5_000_000;

/// Skin chroma window in YCrCb, inclusive (Y, Cr, Cb)
pub const SKIN_YCRCB_LOW: [u8; 3] = [0, 133, 77];
pub const SKIN_YCRCB_HIGH: [u8; 3] = [235, 173, 127];

// =============================================================================
// ARTICLE THRESHOLDS
// =============================================================================

/// Claim length bounds in characters (inclusive)
pub const CLAIM_MIN_CHARS: usize = 70;
pub const CLAIM_MAX_CHARS: usize = 300;

/// Upper bound on claims checked per article
pub const MAX_CLAIMS: usize = 4;

/// Sentences above this word count are subject to the caps-ratio filter
pub const CAPS_RATIO_MIN_WORDS: usize = 6;

/// Max share of capitalised words before a sentence reads as a headline
pub const MAX_CAPS_RATIO: f64 = 0.65;

/// Results requested per evidence query
pub const SEARCH_MAX_RESULTS: usize = 3;

/// Claims checked concurrently
pub const SEARCH_CONCURRENCY: usize = 3;

/// Per-query search timeout (seconds)
pub const SEARCH_TIMEOUT_SECS: u64 = 15;

/// Page fetch timeout (seconds)
pub const FETCH_TIMEOUT_SECS: u64 = 15;

/// Text classifier request timeout (seconds)
pub const CLASSIFIER_TIMEOUT_SECS: u64 = 30;

/// Cleaned article text is cut to this many characters
pub const CONTENT_MAX_CHARS: usize = 6000;

/// The classifier only sees this many leading characters
pub const CLASSIFIER_MAX_CHARS: usize = 512;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
