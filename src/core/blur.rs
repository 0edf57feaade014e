//! Blur measurement via variance of the Laplacian

use image::{DynamicImage, GrayImage};
use imageproc::filter::laplacian_filter;

use crate::types::{Signal, SignalDetail};

pub const SIGNAL_BLURRY: &str = "Image appears blurry";

/// Population variance of the 4-neighbour Laplacian response
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return 0.0;
    }

    let response = laplacian_filter(gray);
    let n = (w as f64) * (h as f64);
    let mean = response.pixels().map(|p| p[0] as f64).sum::<f64>() / n;
    response
        .pixels()
        .map(|p| {
            let d = p[0] as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Strictly below the threshold counts as blurry
pub fn is_blurry(variance: f64, threshold: f64) -> bool {
    variance < threshold
}

/// Whole-image blur signal
pub fn blur_signal(image: &DynamicImage, threshold: f64) -> Signal {
    let variance = laplacian_variance(&image.to_luma8());
    Signal::new(SIGNAL_BLURRY, is_blurry(variance, threshold), SignalDetail::Number(variance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn checkerboard(size: u32, cell: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            if (x / cell + y / cell) % 2 == 0 { Luma([0]) } else { Luma([255]) }
        })
    }

    #[test]
    fn test_flat_image_has_zero_variance() {
        let flat = GrayImage::from_pixel(32, 32, Luma([128]));
        assert_eq!(laplacian_variance(&flat), 0.0);
    }

    #[test]
    fn test_sharp_edges_have_high_variance() {
        let sharp = checkerboard(64, 4);
        assert!(laplacian_variance(&sharp) > 1000.0);
    }

    #[test]
    fn test_blur_signal_on_flat_image() {
        let flat = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([40])));
        let signal = blur_signal(&flat, 100.0);
        assert!(signal.triggered);
        assert_eq!(signal.name, SIGNAL_BLURRY);
    }

    #[test]
    fn test_blur_is_monotonic_in_variance() {
        let threshold = 100.0;
        let mut was_blurry = false;
        let mut v = 500.0;
        while v >= 0.0 {
            let blurry = is_blurry(v, threshold);
            assert!(!(was_blurry && !blurry), "flag un-triggered at {}", v);
            was_blurry = blurry;
            v -= 7.5;
        }
        assert!(was_blurry);
    }
}
