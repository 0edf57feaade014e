//! Core modules for Veracity

pub mod preprocess;
pub mod ocr_signal;
pub mod blur;
pub mod face;
pub mod image_verdict;
pub mod claims;
pub mod evidence;
pub mod article_verdict;
pub mod pipeline;
pub mod report;
pub mod api;

pub use preprocess::{preprocess, load_image, decode_image, Preprocessed};
pub use ocr_signal::{summarize, ocr_signals};
pub use blur::{laplacian_variance, blur_signal};
pub use face::analyze_faces;
pub use image_verdict::ImageFusion;
pub use claims::{ClaimExtractor, split_sentences};
pub use evidence::EvidenceChecker;
pub use pipeline::{ImagePipeline, ArticlePipeline};
pub use report::{save_report, load_report, report_id};
pub use api::{create_router, run_server, AppState};
