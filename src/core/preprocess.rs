//! Image preprocessing for OCR
//!
//! grayscale → 3x3 median → Otsu binary threshold → deskew
//!
//! Deskew measures the minimum-area rectangle around the dark (text) pixels.
//! Its edge angle, taken with y pointing up and normalised to [-90, 0), is
//! turned into a correction: below -45° the complement `-(90 + θ)` is used,
//! otherwise `-θ`. Positive corrections rotate counter-clockwise on screen.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::median_filter;
use imageproc::geometry::min_area_rect;
use imageproc::point::Point;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// Bicubic kernel coefficient (matches common image libraries)
const CUBIC_A: f64 = -0.75;

/// Binarised image ready for OCR
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub image: GrayImage,
    /// Correction applied in degrees, None when deskew was skipped
    pub rotation: Option<f64>,
}

/// Read and decode an image file
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(Error::ImageLoad(format!("Image not found: {}", path.display())));
    }
    image::open(path).map_err(|e| Error::ImageLoad(format!("{}: {}", path.display(), e)))
}

/// Decode an in-memory image
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(Error::ImageLoad("empty image data".to_string()));
    }
    Ok(image::load_from_memory(bytes)?)
}

/// Full preprocessing chain
pub fn preprocess(image: &DynamicImage, min_angle: f64) -> Preprocessed {
    deskew(binarize(image), min_angle)
}

/// Grayscale, median-denoise and Otsu-threshold
pub fn binarize(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let denoised = median_filter(&gray, 1, 1);
    let level = otsu_level(&denoised);
    threshold(&denoised, level, ThresholdType::Binary)
}

/// Rotate text baselines level; no-op without dark pixels or for tiny angles
pub fn deskew(binary: GrayImage, min_angle: f64) -> Preprocessed {
    let points = foreground_points(&binary);
    if points.is_empty() {
        debug!("no foreground pixels, skipping deskew");
        return Preprocessed { image: binary, rotation: None };
    }

    let angle = correction_angle(&min_area_rect(&points));
    if angle.abs() <= min_angle {
        debug!(angle, "rotation correction skipped");
        return Preprocessed { image: binary, rotation: None };
    }

    debug!(angle, "deskewing");
    Preprocessed {
        image: rotate_bicubic(&binary, angle),
        rotation: Some(angle),
    }
}

/// Coordinates of dark pixels (inverse of the binary mask)
fn foreground_points(binary: &GrayImage) -> Vec<Point<i32>> {
    binary
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] == 0)
        .map(|(x, y, _)| Point::new(x as i32, y as i32))
        .collect()
}

/// Correction angle in degrees for a rectangle given by its corners
pub fn correction_angle(rect: &[Point<i32>; 4]) -> f64 {
    let dx = (rect[1].x - rect[0].x) as f64;
    let dy = (rect[1].y - rect[0].y) as f64;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }

    // image rows grow downwards
    let mut theta = (-dy).atan2(dx).to_degrees();
    while theta >= 0.0 {
        theta -= 90.0;
    }
    while theta < -90.0 {
        theta += 90.0;
    }

    if theta < -45.0 {
        -(90.0 + theta)
    } else {
        -theta
    }
}

/// Rotate counter-clockwise by `angle` degrees about the integer centre,
/// bicubic sampling with edge-replicated borders, same output size
pub fn rotate_bicubic(image: &GrayImage, angle: f64) -> GrayImage {
    let (w, h) = image.dimensions();
    let cx = (w / 2) as f64;
    let cy = (h / 2) as f64;
    let (sin, cos) = angle.to_radians().sin_cos();

    GrayImage::from_fn(w, h, |x, y| {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        let sx = cos * dx - sin * dy + cx;
        let sy = sin * dx + cos * dy + cy;
        Luma([sample_bicubic(image, sx, sy)])
    })
}

fn sample_bicubic(image: &GrayImage, sx: f64, sy: f64) -> u8 {
    let (w, h) = image.dimensions();
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;

    let mut acc = 0.0;
    for j in -1..=2i64 {
        let wy = cubic_weight(fy - j as f64);
        let py = clamp_coord(y0 as i64 + j, h);
        for i in -1..=2i64 {
            let wx = cubic_weight(fx - i as f64);
            let px = clamp_coord(x0 as i64 + i, w);
            acc += wx * wy * image.get_pixel(px, py)[0] as f64;
        }
    }
    acc.round().clamp(0.0, 255.0) as u8
}

fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t <= 1.0 {
        ((CUBIC_A + 2.0) * t - (CUBIC_A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((CUBIC_A * t - 5.0 * CUBIC_A) * t + 8.0 * CUBIC_A) * t - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

fn clamp_coord(v: i64, len: u32) -> u32 {
    v.clamp(0, len as i64 - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(w: u32, h: u32) -> GrayImage {
        GrayImage::from_pixel(w, h, Luma([255]))
    }

    #[test]
    fn test_deskew_without_foreground_is_noop() {
        let img = white(40, 30);
        let out = deskew(img.clone(), 0.5);
        assert!(out.rotation.is_none());
        assert_eq!(out.image, img);
    }

    #[test]
    fn test_axis_aligned_text_is_not_rotated() {
        let mut img = white(60, 40);
        for x in 10..50 {
            for y in 15..20 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        let out = deskew(img.clone(), 0.5);
        assert!(out.rotation.is_none());
        assert_eq!(out.image, img);
    }

    /// 200x40 dark block on a white 300x300 canvas, turned clockwise on
    /// screen by `degrees` about the canvas centre
    fn tilted_block(degrees: f64) -> GrayImage {
        let (sin, cos) = degrees.to_radians().sin_cos();
        GrayImage::from_fn(300, 300, |x, y| {
            let dx = x as f64 - 150.0;
            let dy = y as f64 - 150.0;
            let along = dx * cos + dy * sin;
            let across = -dx * sin + dy * cos;
            if along.abs() < 100.0 && across.abs() < 20.0 {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    #[test]
    fn test_deskew_levels_tilted_text() {
        for degrees in [10.0, -10.0, 30.0, -30.0] {
            let out = deskew(tilted_block(degrees), crate::DESKEW_MIN_ANGLE);
            let applied = out.rotation.unwrap();
            assert!((applied - degrees).abs() < 1.0, "tilt {} corrected by {}", degrees, applied);

            let again = deskew(out.image, crate::DESKEW_MIN_ANGLE);
            assert!(again.rotation.is_none(), "tilt {} left {:?}", degrees, again.rotation);
        }
    }

    #[test]
    fn test_correction_angle_signs() {
        // baseline falling to the right (clockwise tilt) needs a positive turn
        let falling = [Point::new(0, 0), Point::new(100, 18), Point::new(0, 0), Point::new(0, 0)];
        assert!(correction_angle(&falling) > 0.0);

        let rising = [Point::new(0, 18), Point::new(100, 0), Point::new(0, 0), Point::new(0, 0)];
        assert!(correction_angle(&rising) < 0.0);
    }

    #[test]
    fn test_correction_angle_complements_steep_edges() {
        // short edge of a block tilted 10° clockwise: 80° from horizontal, y up
        let theta = 80.0f64.to_radians();
        let rect = [
            Point::new(0, 0),
            Point::new((100.0 * theta.cos()).round() as i32, -(100.0 * theta.sin()).round() as i32),
            Point::new(0, 0),
            Point::new(0, 0),
        ];
        let angle = correction_angle(&rect);
        assert!((angle - 10.0).abs() < 0.5, "got {}", angle);
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let mut img = white(20, 20);
        img.put_pixel(5, 7, Luma([0]));
        assert_eq!(rotate_bicubic(&img, 0.0), img);
    }

    #[test]
    fn test_rotate_uniform_stays_uniform() {
        let img = GrayImage::from_pixel(25, 17, Luma([200]));
        let out = rotate_bicubic(&img, 12.0);
        assert!(out.pixels().all(|p| p[0] == 200));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_image(b"not an image"), Err(Error::ImageLoad(_))));
        assert!(matches!(decode_image(&[]), Err(Error::ImageLoad(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(err.to_string().contains("Image not found"));
    }
}
