//! Face detector backed by an external SSD detector program
//!
//! The detector runs the Caffe res10 SSD model. Its assets are validated once
//! when the detector is built; a missing or truncated file disables face
//! analysis only.

use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::FaceDetector;
use crate::error::{Error, Result};
use crate::types::FaceDetection;
use crate::MIN_FACE_WEIGHTS_BYTES;

/// Model files the detector needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceModelAssets {
    pub prototxt: PathBuf,
    pub weights: PathBuf,
}

impl FaceModelAssets {
    pub fn new(prototxt: impl Into<PathBuf>, weights: impl Into<PathBuf>) -> Self {
        Self {
            prototxt: prototxt.into(),
            weights: weights.into(),
        }
    }

    /// Both files present, weights not truncated
    pub fn validate(&self) -> Result<()> {
        require_file(&self.prototxt)?;
        require_file(&self.weights)?;

        let size = std::fs::metadata(&self.weights)?.len();
        if size < MIN_FACE_WEIGHTS_BYTES {
            return Err(Error::ModelAssetCorrupt {
                path: self.weights.display().to_string(),
                size,
            });
        }
        Ok(())
    }
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::ModelAssetMissing(path.display().to_string()))
    }
}

/// Runs `<command> --prototxt P --model M --image I`, expecting a JSON array
/// of `{"confidence": f, "box": {"x0","y0","x1","y1"}}` on stdout
#[derive(Debug, Clone)]
pub struct CommandFaceDetector {
    command: String,
    assets: FaceModelAssets,
}

impl CommandFaceDetector {
    /// Fails with a model asset error if the files are unusable
    pub fn new(command: impl Into<String>, assets: FaceModelAssets) -> Result<Self> {
        assets.validate()?;
        Ok(Self {
            command: command.into(),
            assets,
        })
    }
}

impl FaceDetector for CommandFaceDetector {
    fn detect(&self, image: &RgbImage) -> Result<Vec<FaceDetection>> {
        let file = tempfile::Builder::new().suffix(".png").tempfile()?;
        image
            .save_with_format(file.path(), ImageFormat::Png)
            .map_err(|e| Error::FaceDetection(format!("cannot write detector input: {}", e)))?;

        let output = Command::new(&self.command)
            .arg("--prototxt")
            .arg(&self.assets.prototxt)
            .arg("--model")
            .arg(&self.assets.weights)
            .arg("--image")
            .arg(file.path())
            .output()
            .map_err(|e| Error::FaceDetection(format!("cannot run {}: {}", self.command, e)))?;

        if !output.status.success() {
            return Err(Error::FaceDetection(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::FaceDetection(format!("unreadable detector output: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_missing_prototxt() {
        let dir = tempfile::tempdir().unwrap();
        let assets = FaceModelAssets::new(dir.path().join("deploy.prototxt"), dir.path().join("w.caffemodel"));
        let err = assets.validate().unwrap_err();
        assert!(matches!(err, Error::ModelAssetMissing(ref p) if p.ends_with("deploy.prototxt")));
    }

    #[test]
    fn test_truncated_weights_are_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let prototxt = dir.path().join("deploy.prototxt");
        let weights = dir.path().join("w.caffemodel");
        File::create(&prototxt).unwrap();
        File::create(&weights).unwrap().set_len(1_000).unwrap();

        let err = CommandFaceDetector::new("face-detect", FaceModelAssets::new(prototxt, weights)).unwrap_err();
        assert!(matches!(err, Error::ModelAssetCorrupt { size: 1_000, .. }));
        assert!(err.is_model_asset());
    }

    #[test]
    fn test_full_size_weights_pass() {
        let dir = tempfile::tempdir().unwrap();
        let prototxt = dir.path().join("deploy.prototxt");
        let weights = dir.path().join("w.caffemodel");
        File::create(&prototxt).unwrap();
        File::create(&weights).unwrap().set_len(MIN_FACE_WEIGHTS_BYTES).unwrap();

        assert!(FaceModelAssets::new(prototxt, weights).validate().is_ok());
    }
}
