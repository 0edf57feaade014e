//! Core types for Veracity

mod signal;
mod ocr;
mod face;
mod claim;
mod verdict;
mod report;

pub use signal::{Signal, SignalDetail};
pub use ocr::{OcrOutput, OcrSummary, NO_RECOGNITION};
pub use face::{BoundingBox, PixelBox, FaceDetection, FaceFlag, FaceFlagKind, FaceRegion, FaceAnalysis, FaceStatus};
pub use claim::{Claim, ClaimVerdict};
pub use verdict::{ImageVerdict, AiDetection, OverallVerdict};
pub use report::{ImageReport, ArticleReport, Report, ARTICLE_METHODOLOGY};
