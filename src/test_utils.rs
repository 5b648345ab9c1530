//! Test fixtures for imageops-spatial
//!
//! This module provides small synthetic images with known structure.
//! It is only compiled when running tests.

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Creates a binary checkerboard of single-pixel cells.
///
/// Pixel `(x, y)` is 255 when `x + y` is even and 0 otherwise.
pub fn checkerboard(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        Luma([if (x + y) % 2 == 0 { 255 } else { 0 }])
    })
}

/// Creates a two-level image split vertically.
///
/// Columns `x < width / 2` hold `left`, the rest hold `right`.
pub fn two_level_halves(width: u32, height: u32, left: u8, right: u8) -> GrayImage {
    GrayImage::from_fn(width, height, |x, _| {
        Luma([if x < width / 2 { left } else { right }])
    })
}

/// Creates a binary image with a foreground square.
///
/// # Arguments
/// * `width`, `height` - Dimensions of the image
/// * `offset` - Top-left corner of the square on both axes
/// * `side` - Side length of the square
pub fn binary_square(width: u32, height: u32, offset: u32, side: u32) -> GrayImage {
    let inside = offset..offset + side;
    GrayImage::from_fn(width, height, |x, y| {
        Luma([if inside.contains(&x) && inside.contains(&y) {
            255
        } else {
            0
        }])
    })
}

/// Creates an RGB image whose channels are linear ramps.
///
/// Red grows along x, green along y and blue along the diagonal.
pub fn rgb_ramp(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8])
    })
}

/// Compares two images subpixel by subpixel with a tolerance.
///
/// # Returns
/// `true` if dimensions match and every subpixel differs by at most `tolerance`
pub fn images_approx_equal(expected: &GrayImage, actual: &GrayImage, tolerance: u8) -> bool {
    expected.dimensions() == actual.dimensions()
        && expected
            .as_raw()
            .iter()
            .zip(actual.as_raw())
            .all(|(&e, &a)| e.abs_diff(a) <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates() {
        let board = checkerboard(4, 4);
        assert_eq!(board.get_pixel(0, 0)[0], 255);
        assert_eq!(board.get_pixel(1, 0)[0], 0);
        assert_eq!(board.get_pixel(1, 1)[0], 255);
        assert_eq!(board.pixels().filter(|p| p[0] == 255).count(), 8);
    }

    #[test]
    fn binary_square_places_the_square() {
        let image = binary_square(5, 5, 1, 2);
        assert_eq!(image.pixels().filter(|p| p[0] == 255).count(), 4);
        assert_eq!(image.get_pixel(1, 1)[0], 255);
        assert_eq!(image.get_pixel(3, 3)[0], 0);
    }

    #[test]
    fn images_approx_equal_respects_tolerance() {
        let a = two_level_halves(4, 1, 10, 20);
        let b = two_level_halves(4, 1, 12, 19);
        assert!(images_approx_equal(&a, &b, 2));
        assert!(!images_approx_equal(&a, &b, 1));
        assert!(!images_approx_equal(&a, &checkerboard(2, 2), 255));
    }

    #[test]
    fn rgb_ramp_grows_along_each_axis() {
        let ramp = rgb_ramp(3, 3);
        assert_eq!(ramp.get_pixel(2, 1).0, [32, 16, 24]);
    }
}
