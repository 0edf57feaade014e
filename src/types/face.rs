//! Face detection results and per-region findings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle, in whatever coordinate space the owner documents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// Pixel rectangle clamped to image bounds, end-exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One detector hit; box coordinates normalised to 0..1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub confidence: f32,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// Kind of issue found in a face region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceFlagKind {
    /// Face noticeably blurrier than a sharp scene would be
    Blurry,
    /// Skin pixels disperse too much in colour
    ColorVariance,
}

impl FaceFlagKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Blurry => "blurry",
            Self::ColorVariance => "color_variance",
        }
    }
}

impl fmt::Display for FaceFlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A flagged issue with the value that crossed the threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceFlag {
    pub kind: FaceFlagKind,
    pub value: f64,
}

/// Measurements for one detected face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub bounding_box: PixelBox,
    pub confidence: f32,
    pub blur_variance: f64,
    /// None when too few skin pixels were found to measure
    pub skin_std_max: Option<f64>,
}

/// Result of the face extractor over one image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceAnalysis {
    pub regions: Vec<FaceRegion>,
    pub flags: Vec<FaceFlag>,
}

impl FaceAnalysis {
    pub fn face_detected(&self) -> bool {
        !self.regions.is_empty()
    }

    pub fn any_flagged(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// Whether face analysis ran for a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FaceStatus {
    Analyzed(FaceAnalysis),
    Disabled { reason: String },
}

impl FaceStatus {
    pub fn analysis(&self) -> Option<&FaceAnalysis> {
        match self {
            Self::Analyzed(analysis) => Some(analysis),
            Self::Disabled { .. } => None,
        }
    }
}
