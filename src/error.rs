//! Error taxonomy
//!
//! Input errors abort one analysis. Model asset errors only disable the face
//! capability. Degraded data never shows up here; it flows into the signals.

use thiserror::Error;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// Image could not be read or decoded
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    /// Empty URL, empty text, unusable request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Required face model file is absent
    #[error("Missing model file: {0}")]
    ModelAssetMissing(String),

    /// Face model weights look truncated
    #[error("Model file {path} is too small ({size} bytes), likely corrupted")]
    ModelAssetCorrupt { path: String, size: u64 },

    /// OCR engine failed to run or produced unreadable output
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Face detector failed at inference time
    #[error("Face detection error: {0}")]
    FaceDetection(String),

    /// Text classifier request failed
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Search provider request failed
    #[error("Search error: {0}")]
    Search(String),

    /// Page fetch failed
    #[error("{0}")]
    Fetch(#[from] FetchError),

    /// An external call exceeded its deadline
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error came from a missing or broken model asset
    pub fn is_model_asset(&self) -> bool {
        matches!(self, Self::ModelAssetMissing(_) | Self::ModelAssetCorrupt { .. })
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Self::ImageLoad(e.to_string())
    }
}

/// Structured page fetch failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// 401/403: the site refuses automated clients
    #[error("Site blocked automated access ({status} Forbidden).")]
    Blocked { status: u16 },

    #[error("HTTP Error: {status}")]
    Http { status: u16 },

    #[error("Error fetching: request timed out")]
    Timeout,

    #[error("Error fetching: {0}")]
    Transport(String),
}

impl FetchError {
    /// Classify an HTTP status that is not a success
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Blocked { status },
            _ => Self::Http { status },
        }
    }
}

/// Convenience Result type
pub type Result<T> = std::result::Result<T, Error>;
