//! Internal utility functions for imageops-spatial.
//!
//! This module contains common functionality used across different image operations.

use crate::error::Error;
use crate::Image;
use image::{ImageBuffer, Pixel};
use imageproc::definitions::Clamp;

/// Rounds a floating-point value to the nearest integer and clamps it to `[0, 255]`.
///
/// `imageproc`'s clamp truncates, so the rounding happens first.
///
/// # Arguments
///
/// * `value` - The floating-point value to convert
///
/// # Returns
///
/// The rounded and clamped 8-bit value
#[inline]
pub fn round_f32_to_u8(value: f32) -> u8 {
    <u8 as Clamp<f32>>::clamp(value.round())
}

/// Clamps an integer value to `[0, 255]`.
#[inline]
pub fn clamp_i32_to_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Validates that an image has non-zero dimensions.
///
/// # Arguments
///
/// * `width` - The width of the image
/// * `height` - The height of the image
///
/// # Returns
///
/// `Ok(())` if the dimensions are valid, otherwise `Error::EmptyImage`
pub fn validate_non_empty_image(width: u32, height: u32) -> Result<(), Error> {
    if width == 0 || height == 0 {
        Err(Error::EmptyImage)
    } else {
        Ok(())
    }
}

/// Rebuilds an image from processed row-major subpixels.
pub fn image_from_raw<P>(width: u32, height: u32, data: Vec<u8>) -> Result<Image<P>, Error>
where
    P: Pixel<Subpixel = u8>,
{
    ImageBuffer::from_raw(width, height, data).ok_or(Error::ImageBufferCreationFailed)
}

/// Runs `fill` once per output row.
///
/// Rows are independent: each closure call only writes its own row and reads
/// from buffers captured by reference, so the rows may be processed in
/// parallel when the `rayon` feature is enabled.
pub fn fill_rows<F>(data: &mut [u8], row_len: usize, fill: F)
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        data.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill(y, row));
    }

    #[cfg(not(feature = "rayon"))]
    {
        data.chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill(y, row));
    }
}
