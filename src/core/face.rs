//! Face / skin consistency extractor
//!
//! For every confident detection the region is checked twice:
//! - regional blur: Laplacian variance of the face crop
//! - skin dispersion: max per-channel std of skin-toned pixels (YCrCb window)

use image::{imageops, Rgb, RgbImage};
use tracing::debug;

use super::blur::laplacian_variance;
use crate::adapters::FaceDetector;
use crate::config::ImageConfig;
use crate::error::Result;
use crate::types::{BoundingBox, FaceAnalysis, FaceFlag, FaceFlagKind, FaceRegion, PixelBox};
use crate::{SKIN_YCRCB_HIGH, SKIN_YCRCB_LOW};

/// Run the detector and measure every accepted region
pub fn analyze_faces(
    image: &RgbImage,
    detector: &dyn FaceDetector,
    config: &ImageConfig,
) -> Result<FaceAnalysis> {
    let (w, h) = image.dimensions();
    let mut analysis = FaceAnalysis::default();

    for detection in detector.detect(image)? {
        if detection.confidence < config.min_face_confidence {
            continue;
        }
        let Some(bbox) = to_pixel_box(&detection.bbox, w, h) else {
            debug!(?detection, "degenerate face box dropped");
            continue;
        };

        let crop = imageops::crop_imm(image, bbox.x, bbox.y, bbox.width, bbox.height).to_image();
        let blur_variance = laplacian_variance(&imageops::grayscale(&crop));
        let skin_std_max = skin_std_max(&crop, config.min_skin_pixels);

        if blur_variance < config.face_blur_threshold {
            analysis.flags.push(FaceFlag {
                kind: FaceFlagKind::Blurry,
                value: blur_variance,
            });
        }
        if let Some(std) = skin_std_max {
            if std > config.skin_std_threshold {
                analysis.flags.push(FaceFlag {
                    kind: FaceFlagKind::ColorVariance,
                    value: std,
                });
            }
        }

        analysis.regions.push(FaceRegion {
            bounding_box: bbox,
            confidence: detection.confidence,
            blur_variance,
            skin_std_max,
        });
    }

    debug!(
        faces = analysis.regions.len(),
        flags = analysis.flags.len(),
        "face analysis done"
    );
    Ok(analysis)
}

/// Scale a normalised box to pixels, clamp to bounds; None if empty
pub fn to_pixel_box(bbox: &BoundingBox, width: u32, height: u32) -> Option<PixelBox> {
    let (w, h) = (width as i64, height as i64);
    let x0 = ((bbox.x0 as f64 * w as f64) as i64).max(0);
    let y0 = ((bbox.y0 as f64 * h as f64) as i64).max(0);
    let x1 = ((bbox.x1 as f64 * w as f64) as i64).min(w);
    let y1 = ((bbox.y1 as f64 * h as f64) as i64).min(h);

    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(PixelBox {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

/// Max per-channel population std over skin-toned pixels
///
/// None when fewer than `min_pixels` pixels fall in the skin window.
pub fn skin_std_max(region: &RgbImage, min_pixels: usize) -> Option<f64> {
    let skin: Vec<&Rgb<u8>> = region.pixels().filter(|p| is_skin(to_ycrcb(p))).collect();
    if skin.len() < min_pixels || skin.is_empty() {
        return None;
    }

    let n = skin.len() as f64;
    let std_max = (0..3)
        .map(|c| {
            let mean = skin.iter().map(|p| p[c] as f64).sum::<f64>() / n;
            let var = skin
                .iter()
                .map(|p| {
                    let d = p[c] as f64 - mean;
                    d * d
                })
                .sum::<f64>()
                / n;
            var.sqrt()
        })
        .fold(0.0, f64::max);
    Some(std_max)
}

/// 8-bit BT.601 RGB → (Y, Cr, Cb) with 128 chroma offset
pub fn to_ycrcb(p: &Rgb<u8>) -> [u8; 3] {
    let (r, g, b) = (p[0] as f64, p[1] as f64, p[2] as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cr = (r - y) * 0.713 + 128.0;
    let cb = (b - y) * 0.564 + 128.0;
    [saturate(y), saturate(cr), saturate(cb)]
}

fn saturate(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn is_skin(ycrcb: [u8; 3]) -> bool {
    (0..3).all(|i| ycrcb[i] >= SKIN_YCRCB_LOW[i] && ycrcb[i] <= SKIN_YCRCB_HIGH[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stub::StaticFaceDetector;
    use crate::types::FaceDetection;
    use image::Rgb;

    const SKIN: Rgb<u8> = Rgb([200, 150, 120]);

    fn detection(confidence: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> FaceDetection {
        FaceDetection {
            confidence,
            bbox: BoundingBox::new(x0, y0, x1, y1),
        }
    }

    #[test]
    fn test_reference_skin_tone_is_in_window() {
        assert!(is_skin(to_ycrcb(&SKIN)));
        assert!(!is_skin(to_ycrcb(&Rgb([20, 60, 200]))));
    }

    #[test]
    fn test_pixel_box_clamps_and_rejects_degenerate() {
        let b = to_pixel_box(&BoundingBox::new(-0.1, 0.2, 1.3, 0.6), 100, 50).unwrap();
        assert_eq!(b, PixelBox { x: 0, y: 10, width: 100, height: 20 });

        assert!(to_pixel_box(&BoundingBox::new(0.5, 0.5, 0.5, 0.9), 100, 100).is_none());
        assert!(to_pixel_box(&BoundingBox::new(0.9, 0.1, 0.2, 0.5), 100, 100).is_none());
        assert!(to_pixel_box(&BoundingBox::new(1.2, 0.1, 1.5, 0.5), 100, 100).is_none());
    }

    #[test]
    fn test_skin_check_needs_enough_pixels() {
        let small = RgbImage::from_pixel(10, 10, SKIN);
        assert_eq!(skin_std_max(&small, 500), None);

        let large = RgbImage::from_pixel(30, 30, SKIN);
        assert_eq!(skin_std_max(&large, 500), Some(0.0));
    }

    #[test]
    fn test_dispersed_skin_is_flagged() {
        // alternating light/dark skin tones, both inside the chroma window
        let light = Rgb([235, 180, 150]);
        let dark = Rgb([120, 80, 60]);
        assert!(is_skin(to_ycrcb(&light)) && is_skin(to_ycrcb(&dark)));

        let img = RgbImage::from_fn(40, 40, |x, _| if x % 2 == 0 { light } else { dark });
        let std = skin_std_max(&img, 500).unwrap();
        assert!(std > 45.0, "got {}", std);
    }

    #[test]
    fn test_flat_face_is_blurry_but_uniform() {
        let img = RgbImage::from_pixel(100, 100, SKIN);
        let detector = StaticFaceDetector::new(vec![detection(0.9, 0.2, 0.2, 0.8, 0.8)]);
        let analysis = analyze_faces(&img, &detector, &ImageConfig::default()).unwrap();

        assert_eq!(analysis.regions.len(), 1);
        assert_eq!(analysis.flags.len(), 1);
        assert_eq!(analysis.flags[0].kind, FaceFlagKind::Blurry);
        assert_eq!(analysis.regions[0].skin_std_max, Some(0.0));
    }

    #[test]
    fn test_low_confidence_detections_ignored() {
        let img = RgbImage::from_pixel(50, 50, SKIN);
        let detector = StaticFaceDetector::new(vec![detection(0.3, 0.1, 0.1, 0.9, 0.9)]);
        let analysis = analyze_faces(&img, &detector, &ImageConfig::default()).unwrap();
        assert!(!analysis.face_detected());
        assert!(!analysis.any_flagged());
    }
}
